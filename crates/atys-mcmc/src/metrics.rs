use std::fs::File;
use std::io::Write;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::accept::ScoreBreakdown;

/// Per-iteration metrics stored for CSV export.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricSample {
    /// Iteration (post burn-in) when the sample was recorded.
    pub iteration: usize,
    /// Number of types in the committed hierarchy.
    pub num_types: usize,
    /// Score breakdown of the committed state.
    pub score: ScoreBreakdown,
    /// Atoms matched by no type.
    pub untyped_atoms: usize,
    /// Cumulative accepted proposals at sampling time.
    pub accepted_moves: usize,
    /// Cumulative issued proposals at sampling time.
    pub proposed_moves: usize,
    /// Canonical hash of the committed hierarchy.
    pub hierarchy_hash: String,
}

/// Aggregate coverage metrics summarising the chain's exploration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoverageMetrics {
    /// Number of unique hierarchy hashes visited by recorded samples.
    pub unique_hierarchies: usize,
    /// Mean total score over the recorded samples.
    pub mean_score: f64,
    /// Variance of the recorded total scores.
    pub score_variance: f64,
    /// Accepted over proposed moves at the last recorded sample.
    pub final_acceptance_rate: f64,
}

impl CoverageMetrics {
    /// Returns an empty coverage descriptor.
    pub fn empty() -> Self {
        Self {
            unique_hierarchies: 0,
            mean_score: 0.0,
            score_variance: 0.0,
            final_acceptance_rate: 0.0,
        }
    }
}

/// Collects per-iteration metrics and computes aggregate coverage.
#[derive(Debug, Default)]
pub struct MetricsRecorder {
    samples: Vec<MetricSample>,
    unique_hashes: IndexSet<String>,
}

impl MetricsRecorder {
    /// Creates a new recorder instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a metrics sample.
    pub fn push_sample(&mut self, sample: MetricSample) {
        self.unique_hashes.insert(sample.hierarchy_hash.clone());
        self.samples.push(sample);
    }

    /// Returns an immutable view over the recorded samples.
    pub fn samples(&self) -> &[MetricSample] {
        &self.samples
    }

    /// Computes coverage metrics from the recorded data.
    pub fn coverage(&self) -> CoverageMetrics {
        if self.samples.is_empty() {
            return CoverageMetrics::empty();
        }
        let scores: Vec<f64> = self
            .samples
            .iter()
            .map(|sample| sample.score.total)
            .collect();
        let mean_score = scores.iter().sum::<f64>() / scores.len() as f64;
        let score_variance = if scores.len() > 1 {
            let mean_sq = scores.iter().map(|&s| s * s).sum::<f64>() / scores.len() as f64;
            (mean_sq - mean_score * mean_score).max(0.0)
        } else {
            0.0
        };
        let final_acceptance_rate = self
            .samples
            .last()
            .filter(|sample| sample.proposed_moves > 0)
            .map(|sample| sample.accepted_moves as f64 / sample.proposed_moves as f64)
            .unwrap_or(0.0);
        CoverageMetrics {
            unique_hierarchies: self.unique_hashes.len(),
            mean_score,
            score_variance,
            final_acceptance_rate,
        }
    }

    /// Writes the recorded metrics to a CSV file.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        writeln!(
            file,
            "iteration,num_types,score,specificity,complexity,untyped,accepted,proposed,hierarchy_hash"
        )?;
        for sample in &self.samples {
            writeln!(
                file,
                "{},{},{:.6},{:.6},{:.6},{},{},{},{}",
                sample.iteration,
                sample.num_types,
                sample.score.total,
                sample.score.specificity,
                sample.score.complexity,
                sample.untyped_atoms,
                sample.accepted_moves,
                sample.proposed_moves,
                sample.hierarchy_hash
            )?;
        }
        Ok(())
    }
}
