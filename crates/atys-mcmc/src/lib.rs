#![deny(missing_docs)]

//! Reversible-jump MCMC sampler over ordered atom-type hierarchies.
//!
//! The sampler explores the space of type hierarchies by proposing birth
//! moves (appending a decorated child of an existing type) and death moves
//! (removing a non-base type), reparameterizing the molecule set against
//! each candidate, and accepting or rejecting via a Metropolis test on the
//! typing score. Runs are deterministic for a given seed: every iteration
//! draws from its own derived substream.

/// Acceptance rule and typing score.
pub mod accept;
/// YAML configuration schema and defaults.
pub mod config;
/// Deterministic seed derivation helpers.
pub mod determinism;
/// Core sampling kernel and public `run` entry points.
pub mod kernel;
/// Run manifest serialization helpers.
pub mod manifest;
/// Metrics collection and coverage summaries.
pub mod metrics;
/// Birth/death proposal engine.
pub mod moves;
/// Full-recompute reparameterizer.
pub mod reparam;

pub use accept::{acceptance_probability, score, ScoreBreakdown};
pub use config::{OutputConfig, PriorWeights, ProposalStrategy, RunConfig, SeedPolicy};
pub use kernel::{run, run_chains, run_with_stop, RunSummary, TypeReport};
pub use manifest::RunManifest;
pub use metrics::{CoverageMetrics, MetricSample};
pub use moves::{propose_birth, propose_death, MoveDraw, MoveKind, TypeProposal};
pub use reparam::{reparameterize, TypeAssignment};
