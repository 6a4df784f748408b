use atys_chem::Hierarchy;
use serde::{Deserialize, Serialize};

use crate::config::PriorWeights;
use crate::moves::MoveKind;
use crate::reparam::TypeAssignment;

/// Breakdown of the typing score used to construct the acceptance ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Atoms captured, weighted by the depth of the capturing type.
    pub specificity: f64,
    /// Number of non-base types.
    pub complexity: f64,
    /// Weighted total score.
    pub total: f64,
}

impl ScoreBreakdown {
    /// Creates a zeroed breakdown for convenience.
    pub fn zero() -> Self {
        Self {
            specificity: 0.0,
            complexity: 0.0,
            total: 0.0,
        }
    }
}

/// Computes the weighted typing score for a hierarchy and its assignment.
///
/// The specificity term grows when more atoms are captured by deeper
/// (more decorated) types; the complexity term is a prior favouring fewer,
/// more general types.
pub fn score(
    hierarchy: &Hierarchy,
    assignment: &TypeAssignment,
    weights: &PriorWeights,
) -> ScoreBreakdown {
    let specificity: f64 = hierarchy
        .match_order()
        .iter()
        .map(|atom_type| atom_type.depth() as f64 * assignment.count(&atom_type.name) as f64)
        .sum();
    let complexity = hierarchy.non_base().len() as f64;
    let total = weights.specificity * specificity - weights.type_penalty * complexity;
    ScoreBreakdown {
        specificity,
        complexity,
        total,
    }
}

/// Hard rejection rule: a birth whose new type captured zero atoms anywhere
/// in the molecule set is never admitted, pre-empting any probabilistic test.
pub fn is_zero_match_birth(kind: MoveKind, subject: &str, candidate: &TypeAssignment) -> bool {
    kind == MoveKind::Birth && candidate.count(subject) == 0
}

/// Computes the Metropolis acceptance probability for a dimension-changing
/// move.
///
/// The ratio is `exp(delta / temperature)` corrected for the asymmetric
/// birth/death split: a birth is weighted by `p_death / p_birth` and a death
/// by the inverse. Known gap: the reverse-move selection probability (one
/// over the number of removable types after a birth) is not folded in, so
/// detailed balance holds only approximately.
pub fn acceptance_probability(
    kind: MoveKind,
    current: &ScoreBreakdown,
    candidate: &ScoreBreakdown,
    birth_probability: f64,
    temperature: f64,
) -> f64 {
    let p_birth = birth_probability.clamp(1e-9, 1.0 - 1e-9);
    let correction = match kind {
        MoveKind::Birth => (1.0 - p_birth) / p_birth,
        MoveKind::Death => p_birth / (1.0 - p_birth),
    };
    let delta = candidate.total - current.total;
    (correction * (delta / temperature.max(1e-9)).exp()).min(1.0)
}
