use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use atys_chem::{DecoratorVocabulary, Hierarchy, Matcher, MoleculeSet};
use atys_core::errors::ErrorInfo;
use atys_core::{AtysError, RngHandle};
use serde::{Deserialize, Serialize};

use crate::accept::{self, ScoreBreakdown};
use crate::config::RunConfig;
use crate::determinism;
use crate::manifest::RunManifest;
use crate::metrics::{CoverageMetrics, MetricSample, MetricsRecorder};
use crate::moves::{self, MoveDraw, MoveKind};
use crate::reparam::{self, TypeAssignment};

/// In-band rejection labels used in summaries. These are normal chain
/// outcomes, never errors.
const DUPLICATE_PATTERN: &str = "duplicate-pattern";
const ZERO_MATCH: &str = "zero-match";
const NO_REMOVABLE: &str = "no-removable-types";

/// One row of the final type listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeReport {
    /// Human-readable type name.
    pub name: String,
    /// Full pattern string.
    pub pattern: String,
    /// Number of decorators between the type and its base ancestor.
    pub depth: usize,
    /// Atoms the type captured in the final committed assignment.
    pub matched_atoms: usize,
    /// Whether the type belongs to the immutable base prefix.
    pub is_base: bool,
}

/// Summary returned to callers after a run completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Iterations actually executed (may be short of the budget when a
    /// stop signal fired).
    pub iterations: usize,
    /// Acceptance rates per move kind.
    pub acceptance_rates: BTreeMap<String, f64>,
    /// Counts of in-band rejections and skips by reason.
    pub in_band_rejections: BTreeMap<String, usize>,
    /// Final committed type listing in precedence order.
    pub type_report: Vec<TypeReport>,
    /// Iterations each non-base type survived, summed over its lifetimes.
    pub type_lifetimes: BTreeMap<String, usize>,
    /// Atoms matched by no type in the final committed assignment.
    pub untyped_atoms: usize,
    /// Canonical hash of the final committed hierarchy.
    pub final_hierarchy_hash: String,
    /// Coverage metrics captured during the run.
    pub coverage: CoverageMetrics,
    /// Metrics samples collected (useful for tests/diagnostics).
    pub samples: Vec<MetricSample>,
    /// Metrics CSV written during the run.
    pub metrics_path: Option<PathBuf>,
    /// Manifest path, if emitted.
    pub manifest_path: Option<PathBuf>,
    /// Serialized hierarchy path, if emitted.
    pub hierarchy_path: Option<PathBuf>,
}

/// Chain state threaded through the iteration loop. A proposal produces a
/// candidate value; committing replaces these handles, reverting drops the
/// candidate. Nothing else in the process holds mutable sampler state.
struct ChainState {
    hierarchy: Hierarchy,
    assignment: TypeAssignment,
    score: ScoreBreakdown,
    accepted: BTreeMap<MoveKind, usize>,
    proposed: BTreeMap<MoveKind, usize>,
    in_band: BTreeMap<String, usize>,
    born_at: BTreeMap<String, usize>,
    lifetimes: BTreeMap<String, usize>,
}

impl ChainState {
    fn new(
        hierarchy: Hierarchy,
        molecules: &MoleculeSet,
        matcher: &dyn Matcher,
        config: &RunConfig,
    ) -> Result<Self, AtysError> {
        let assignment = reparam::reparameterize(&hierarchy, molecules, matcher)?;
        let score = accept::score(&hierarchy, &assignment, &config.prior);
        Ok(Self {
            hierarchy,
            assignment,
            score,
            accepted: BTreeMap::new(),
            proposed: BTreeMap::new(),
            in_band: BTreeMap::new(),
            born_at: BTreeMap::new(),
            lifetimes: BTreeMap::new(),
        })
    }

    fn record(&mut self, kind: MoveKind, accepted: bool) {
        *self.proposed.entry(kind).or_insert(0) += 1;
        if accepted {
            *self.accepted.entry(kind).or_insert(0) += 1;
        }
    }

    fn note(&mut self, label: &str) {
        *self.in_band.entry(label.to_string()).or_insert(0) += 1;
    }

    fn totals(&self) -> (usize, usize) {
        (
            self.accepted.values().copied().sum(),
            self.proposed.values().copied().sum(),
        )
    }
}

/// Runs the sampler from the base hierarchy with the provided seed.
pub fn run(
    config: &RunConfig,
    seed: u64,
    base: &Hierarchy,
    vocabulary: &DecoratorVocabulary,
    molecules: &MoleculeSet,
    matcher: &dyn Matcher,
) -> Result<RunSummary, AtysError> {
    run_inner(config, seed, base, vocabulary, molecules, matcher, None)
}

/// Runs the sampler with a cooperative stop flag, checked once per
/// iteration before proposing.
pub fn run_with_stop(
    config: &RunConfig,
    seed: u64,
    base: &Hierarchy,
    vocabulary: &DecoratorVocabulary,
    molecules: &MoleculeSet,
    matcher: &dyn Matcher,
    stop: &AtomicBool,
) -> Result<RunSummary, AtysError> {
    run_inner(config, seed, base, vocabulary, molecules, matcher, Some(stop))
}

/// Runs several independent chains with seeds derived from the configured
/// master seed. Chains share no mutable state; summaries are collected
/// after all threads join. When a run directory is configured each chain
/// writes into its own `chain-NN` subdirectory.
pub fn run_chains(
    config: &RunConfig,
    chains: usize,
    base: &Hierarchy,
    vocabulary: &DecoratorVocabulary,
    molecules: &MoleculeSet,
    matcher: &dyn Matcher,
) -> Result<Vec<RunSummary>, AtysError> {
    let results: Vec<Result<RunSummary, AtysError>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..chains)
            .map(|chain_index| {
                let mut chain_config = config.clone();
                if let Some(dir) = &config.output.run_directory {
                    chain_config.output.run_directory =
                        Some(dir.join(format!("chain-{chain_index:02}")));
                }
                let seed = determinism::chain_seed(config.seed_policy.master_seed, chain_index);
                scope.spawn(move || {
                    run(&chain_config, seed, base, vocabulary, molecules, matcher)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(result) => result,
                Err(payload) => std::panic::resume_unwind(payload),
            })
            .collect()
    });
    results.into_iter().collect()
}

#[allow(clippy::too_many_arguments)]
fn run_inner(
    config: &RunConfig,
    seed: u64,
    base: &Hierarchy,
    vocabulary: &DecoratorVocabulary,
    molecules: &MoleculeSet,
    matcher: &dyn Matcher,
    stop: Option<&AtomicBool>,
) -> Result<RunSummary, AtysError> {
    let mut state = ChainState::new(base.clone(), molecules, matcher, config)?;
    let mut recorder = MetricsRecorder::new();
    let mut completed = 0usize;

    for iteration in 0..config.iterations {
        if stop.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            break;
        }
        completed = iteration + 1;
        let mut move_rng = RngHandle::from_seed(determinism::move_seed(seed, iteration));
        let p_birth = config.birth_probability.clamp(0.0, 1.0);

        let mut kind = if move_rng.unit_f64() < p_birth {
            MoveKind::Birth
        } else {
            MoveKind::Death
        };
        if kind == MoveKind::Death && state.hierarchy.non_base().is_empty() {
            // One resample of the move kind; a second fruitless death draw
            // skips the iteration as an in-band outcome.
            kind = if move_rng.unit_f64() < p_birth {
                MoveKind::Birth
            } else {
                MoveKind::Death
            };
            if kind == MoveKind::Death {
                state.note(NO_REMOVABLE);
                record_metrics(config, iteration, &mut recorder, &state);
                continue;
            }
        }

        let draw = match kind {
            MoveKind::Birth => {
                moves::propose_birth(&state.hierarchy, vocabulary, &config.strategy, &mut move_rng)?
            }
            MoveKind::Death => moves::propose_death(&state.hierarchy, &mut move_rng)?,
        };

        match draw {
            MoveDraw::NoRemovableTypes => state.note(NO_REMOVABLE),
            MoveDraw::DuplicatePattern { .. } => {
                state.record(MoveKind::Birth, false);
                state.note(DUPLICATE_PATTERN);
            }
            MoveDraw::Proposal(proposal) => {
                let candidate_assignment =
                    reparam::reparameterize(&proposal.candidate, molecules, matcher)?;
                if accept::is_zero_match_birth(
                    proposal.kind,
                    &proposal.subject,
                    &candidate_assignment,
                ) {
                    state.record(proposal.kind, false);
                    state.note(ZERO_MATCH);
                } else {
                    let candidate_score =
                        accept::score(&proposal.candidate, &candidate_assignment, &config.prior);
                    let acceptance = accept::acceptance_probability(
                        proposal.kind,
                        &state.score,
                        &candidate_score,
                        config.birth_probability,
                        config.prior.temperature,
                    );
                    let accepted = move_rng.unit_f64() < acceptance;
                    state.record(proposal.kind, accepted);
                    if accepted {
                        match proposal.kind {
                            MoveKind::Birth => {
                                state.born_at.insert(proposal.subject.clone(), iteration);
                            }
                            MoveKind::Death => {
                                let born =
                                    state.born_at.remove(&proposal.subject).unwrap_or(iteration);
                                *state
                                    .lifetimes
                                    .entry(proposal.subject.clone())
                                    .or_insert(0) += iteration - born;
                            }
                        }
                        state.hierarchy = proposal.candidate;
                        state.assignment = candidate_assignment;
                        state.score = candidate_score;
                    }
                }
            }
        }

        record_metrics(config, iteration, &mut recorder, &state);
    }

    // Types still alive at termination count their remaining span.
    for (name, born) in std::mem::take(&mut state.born_at) {
        *state.lifetimes.entry(name).or_insert(0) += completed.saturating_sub(born);
    }

    let final_hierarchy_hash = state.hierarchy.canonical_hash();
    let (metrics_path, manifest_path, hierarchy_path) =
        write_outputs(config, seed, &state, &recorder, &final_hierarchy_hash)?;

    let type_report = state
        .hierarchy
        .match_order()
        .iter()
        .map(|atom_type| TypeReport {
            name: atom_type.name.clone(),
            pattern: atom_type.pattern.clone(),
            depth: atom_type.depth(),
            matched_atoms: state.assignment.count(&atom_type.name),
            is_base: atom_type.is_base,
        })
        .collect();

    Ok(RunSummary {
        iterations: completed,
        acceptance_rates: acceptance_rates(&state),
        in_band_rejections: state.in_band.clone(),
        type_report,
        type_lifetimes: state.lifetimes.clone(),
        untyped_atoms: state.assignment.untyped,
        final_hierarchy_hash,
        coverage: recorder.coverage(),
        samples: recorder.samples().to_vec(),
        metrics_path,
        manifest_path,
        hierarchy_path,
    })
}

fn record_metrics(
    config: &RunConfig,
    iteration: usize,
    recorder: &mut MetricsRecorder,
    state: &ChainState,
) {
    if iteration < config.burn_in {
        return;
    }
    if ((iteration - config.burn_in) % config.thinning.max(1)) != 0 {
        return;
    }
    let (accepted_moves, proposed_moves) = state.totals();
    recorder.push_sample(MetricSample {
        iteration,
        num_types: state.hierarchy.len(),
        score: state.score.clone(),
        untyped_atoms: state.assignment.untyped,
        accepted_moves,
        proposed_moves,
        hierarchy_hash: state.hierarchy.canonical_hash(),
    });
}

fn acceptance_rates(state: &ChainState) -> BTreeMap<String, f64> {
    state
        .proposed
        .iter()
        .map(|(kind, &proposed)| {
            let accepted = state.accepted.get(kind).copied().unwrap_or(0);
            let rate = if proposed == 0 {
                0.0
            } else {
                accepted as f64 / proposed as f64
            };
            (kind.as_str().to_string(), rate)
        })
        .collect()
}

type OutputPaths = (Option<PathBuf>, Option<PathBuf>, Option<PathBuf>);

fn write_outputs(
    config: &RunConfig,
    seed: u64,
    state: &ChainState,
    recorder: &MetricsRecorder,
    hierarchy_hash: &str,
) -> Result<OutputPaths, AtysError> {
    let Some(run_dir) = &config.output.run_directory else {
        return Ok((None, None, None));
    };
    std::fs::create_dir_all(run_dir).map_err(|err| {
        AtysError::Serde(
            ErrorInfo::new("run-dir-mkdir", err.to_string())
                .with_context("path", run_dir.display().to_string()),
        )
    })?;

    let hierarchy_path = run_dir.join(&config.output.hierarchy_file);
    std::fs::write(&hierarchy_path, state.hierarchy.serialize()).map_err(|err| {
        AtysError::Serde(
            ErrorInfo::new("hierarchy-write", err.to_string())
                .with_context("path", hierarchy_path.display().to_string()),
        )
    })?;

    let metrics_path = run_dir.join(&config.output.metrics_file);
    recorder.write_csv(&metrics_path).map_err(|err| {
        AtysError::Serde(
            ErrorInfo::new("metrics-write", err.to_string())
                .with_context("path", metrics_path.display().to_string()),
        )
    })?;

    let manifest_path = run_dir.join(&config.output.manifest_file);
    let manifest = RunManifest {
        config: config.clone(),
        master_seed: seed,
        seed_label: config.seed_policy.label.clone(),
        hierarchy_hash: hierarchy_hash.to_string(),
        metrics_file: Some(config.output.metrics_file.clone()),
        hierarchy_file: Some(config.output.hierarchy_file.clone()),
    };
    manifest.write(&manifest_path)?;

    Ok((
        Some(metrics_path),
        Some(manifest_path),
        Some(hierarchy_path),
    ))
}
