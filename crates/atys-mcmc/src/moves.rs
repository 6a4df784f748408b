use atys_chem::{combine_pattern, AtomType, DecoratorVocabulary, Hierarchy, VocabularyKind};
use atys_core::errors::ErrorInfo;
use atys_core::{AtysError, RngHandle};
use serde::{Deserialize, Serialize};

use crate::config::ProposalStrategy;

/// Kind of dimension-changing move attempted by the sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Append a new type derived from an existing parent.
    Birth,
    /// Remove an existing non-base type.
    Death,
}

impl MoveKind {
    /// Stable string form used in summaries and CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoveKind::Birth => "birth",
            MoveKind::Death => "death",
        }
    }
}

/// A concrete candidate hierarchy produced by the proposal engine.
#[derive(Debug, Clone)]
pub struct TypeProposal {
    /// Candidate hierarchy to be reparameterized and evaluated.
    pub candidate: Hierarchy,
    /// Move kind that produced the candidate.
    pub kind: MoveKind,
    /// Name of the type created (birth) or removed (death).
    pub subject: String,
    /// Forward proposal probability of this exact draw.
    pub forward_prob: f64,
    /// Human readable description of the move.
    pub description: String,
}

/// Outcome of a proposal draw. The non-`Proposal` variants are in-band
/// chain outcomes, not errors: the kernel records them and continues.
#[derive(Debug, Clone)]
pub enum MoveDraw {
    /// A candidate worth reparameterizing.
    Proposal(TypeProposal),
    /// The composed pattern already exists verbatim; automatic reject
    /// without reparameterization.
    DuplicatePattern {
        /// The offending composite pattern.
        pattern: String,
    },
    /// A death draw found no removable types; the kernel resamples.
    NoRemovableTypes,
}

/// Draws a birth proposal: a uniformly random parent (any current type, not
/// only leaves) extended with decorator(s) drawn from the vocabulary
/// according to the configured strategy.
pub fn propose_birth(
    hierarchy: &Hierarchy,
    vocabulary: &DecoratorVocabulary,
    strategy: &ProposalStrategy,
    rng: &mut RngHandle,
) -> Result<MoveDraw, AtysError> {
    if hierarchy.is_empty() {
        return Err(AtysError::NotFound(ErrorInfo::new(
            "empty-hierarchy",
            "cannot propose a birth without any parent types",
        )));
    }
    if vocabulary.is_empty() {
        return Err(AtysError::MalformedDecorator(ErrorInfo::new(
            "empty-vocabulary",
            "cannot propose a birth from an empty vocabulary",
        )));
    }
    check_strategy_vocabulary(strategy, vocabulary)?;

    let parents = hierarchy.match_order();
    let parent = &parents[rng.index(parents.len())];

    let (pattern, name, tokens, forward_prob) = match strategy {
        ProposalStrategy::Simple => {
            let decorator = &vocabulary.decorators()[rng.index(vocabulary.len())];
            let pattern = combine_pattern(&parent.pattern, &[decorator.fragment.as_str()]);
            let name = format!("{} {}", parent.name, decorator.token);
            let forward_prob = 1.0 / (parents.len() * vocabulary.len()) as f64;
            (pattern, name, vec![decorator.token.clone()], forward_prob)
        }
        ProposalStrategy::Combinatorial { max_decorators } => {
            let k_max = (*max_decorators).clamp(1, vocabulary.len());
            let k = 1 + rng.index(k_max);
            let chosen = sample_distinct(vocabulary.len(), k, rng);
            let fragments: Vec<&str> = chosen
                .iter()
                .map(|&index| vocabulary.decorators()[index].fragment.as_str())
                .collect();
            let pattern = combine_pattern(&parent.pattern, &fragments);
            let mut name = parent.name.clone();
            let mut tokens = Vec::with_capacity(k);
            for &index in &chosen {
                let token = &vocabulary.decorators()[index].token;
                name.push(' ');
                name.push_str(token);
                tokens.push(token.clone());
            }
            let forward_prob =
                1.0 / (parents.len() * k_max) as f64 / ordered_draws(vocabulary.len(), k);
            (pattern, name, tokens, forward_prob)
        }
    };

    let candidate_type = AtomType::derived(parent, pattern.clone(), name.clone(), tokens);
    match hierarchy.append(candidate_type) {
        Ok(candidate) => Ok(MoveDraw::Proposal(TypeProposal {
            candidate,
            kind: MoveKind::Birth,
            subject: name.clone(),
            forward_prob,
            description: format!("birth:{name}"),
        })),
        // A composed name colliding with a multi-word base name is the same
        // in-band outcome as a recomposed pattern: redraw, never abort.
        Err(AtysError::DuplicatePattern(_)) | Err(AtysError::DuplicateName(_)) => {
            Ok(MoveDraw::DuplicatePattern { pattern })
        }
        Err(other) => Err(other),
    }
}

/// Draws a death proposal over the non-base types, uniformly.
pub fn propose_death(hierarchy: &Hierarchy, rng: &mut RngHandle) -> Result<MoveDraw, AtysError> {
    let removable = hierarchy.non_base();
    if removable.is_empty() {
        return Ok(MoveDraw::NoRemovableTypes);
    }
    let target = &removable[rng.index(removable.len())];
    let candidate = hierarchy.remove(&target.name)?;
    Ok(MoveDraw::Proposal(TypeProposal {
        candidate,
        kind: MoveKind::Death,
        subject: target.name.clone(),
        forward_prob: 1.0 / removable.len() as f64,
        description: format!("death:{}", target.name),
    }))
}

fn check_strategy_vocabulary(
    strategy: &ProposalStrategy,
    vocabulary: &DecoratorVocabulary,
) -> Result<(), AtysError> {
    let expected = match strategy {
        ProposalStrategy::Simple => VocabularyKind::Simple,
        ProposalStrategy::Combinatorial { .. } => VocabularyKind::Combinatorial,
    };
    if vocabulary.kind() != expected {
        return Err(AtysError::MalformedDecorator(
            ErrorInfo::new(
                "vocabulary-kind",
                "vocabulary kind does not match the configured strategy",
            )
            .with_hint("load the simple vocabulary for the simple strategy and vice versa"),
        ));
    }
    Ok(())
}

/// Samples `k` distinct indices in `0..len` without replacement, preserving
/// selection order.
fn sample_distinct(len: usize, k: usize, rng: &mut RngHandle) -> Vec<usize> {
    let mut pool: Vec<usize> = (0..len).collect();
    let mut chosen = Vec::with_capacity(k);
    for _ in 0..k.min(len) {
        let position = rng.index(pool.len());
        chosen.push(pool.swap_remove(position));
    }
    chosen
}

/// Number of ordered draws of `k` distinct items from `len`.
fn ordered_draws(len: usize, k: usize) -> f64 {
    let mut total = 1.0;
    for offset in 0..k {
        total *= (len - offset) as f64;
    }
    total
}
