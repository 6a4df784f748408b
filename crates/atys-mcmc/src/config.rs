use std::path::PathBuf;

use atys_core::errors::ErrorInfo;
use atys_core::AtysError;
use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing a sampler run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of Markov chain iterations to execute.
    pub iterations: usize,
    /// Number of initial iterations to discard when recording metrics.
    #[serde(default)]
    pub burn_in: usize,
    /// Interval at which to record metrics samples.
    #[serde(default = "default_thinning")]
    pub thinning: usize,
    /// Probability of drawing a birth move at each iteration (death
    /// otherwise).
    #[serde(default = "default_birth_probability")]
    pub birth_probability: f64,
    /// Proposal strategy used for birth moves.
    #[serde(default)]
    pub strategy: ProposalStrategy,
    /// Weights for the typing score and its prior.
    #[serde(default)]
    pub prior: PriorWeights,
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Output directory configuration.
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_thinning() -> usize {
    1
}

fn default_birth_probability() -> f64 {
    0.5
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            iterations: 64,
            burn_in: 0,
            thinning: 1,
            birth_probability: default_birth_probability(),
            strategy: ProposalStrategy::default(),
            prior: PriorWeights::default(),
            seed_policy: SeedPolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

impl RunConfig {
    /// Parses a configuration from YAML text.
    pub fn from_yaml(source: &str) -> Result<Self, AtysError> {
        serde_yaml::from_str(source).map_err(|err| {
            AtysError::Serde(ErrorInfo::new("config-parse", err.to_string()))
        })
    }
}

/// Birth-move proposal strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ProposalStrategy {
    /// One atom-bearing decorator ANDed onto the parent pattern.
    Simple,
    /// Several bare decorators composed positionally onto the parent.
    Combinatorial {
        /// Upper bound on the number of decorators drawn per proposal.
        #[serde(default = "default_max_decorators")]
        max_decorators: usize,
    },
}

fn default_max_decorators() -> usize {
    3
}

impl Default for ProposalStrategy {
    fn default() -> Self {
        ProposalStrategy::Simple
    }
}

/// Weights applied to the typing score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorWeights {
    /// Weight for the specificity term (atoms captured by deeper types).
    #[serde(default = "default_specificity_weight")]
    pub specificity: f64,
    /// Penalty per non-base type, favouring fewer, more general types.
    #[serde(default = "default_type_penalty")]
    pub type_penalty: f64,
    /// Temperature dividing the score delta in the acceptance ratio.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

fn default_specificity_weight() -> f64 {
    1.0
}

fn default_type_penalty() -> f64 {
    1.0
}

fn default_temperature() -> f64 {
    1.0
}

impl Default for PriorWeights {
    fn default() -> Self {
        Self {
            specificity: default_specificity_weight(),
            type_penalty: default_type_penalty(),
            temperature: default_temperature(),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used for the run.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label used when deriving substream seeds (documented in
    /// manifests).
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x05EE_D5EE_DD15_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Output directory layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Root directory for run artefacts. Created if it does not exist.
    #[serde(default)]
    pub run_directory: Option<PathBuf>,
    /// Metrics filename relative to `run_directory`.
    #[serde(default = "default_metrics_filename")]
    pub metrics_file: PathBuf,
    /// Manifest filename relative to `run_directory`.
    #[serde(default = "default_manifest_filename")]
    pub manifest_file: PathBuf,
    /// Committed hierarchy filename relative to `run_directory`.
    #[serde(default = "default_hierarchy_filename")]
    pub hierarchy_file: PathBuf,
}

fn default_metrics_filename() -> PathBuf {
    PathBuf::from("metrics.csv")
}

fn default_manifest_filename() -> PathBuf {
    PathBuf::from("manifest.json")
}

fn default_hierarchy_filename() -> PathBuf {
    PathBuf::from("hierarchy.smarts")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            run_directory: None,
            metrics_file: default_metrics_filename(),
            manifest_file: default_manifest_filename(),
            hierarchy_file: default_hierarchy_filename(),
        }
    }
}
