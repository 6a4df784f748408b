//! Decorator vocabularies loaded from line-oriented text sources.

use atys_core::errors::ErrorInfo;
use atys_core::AtysError;
use serde::{Deserialize, Serialize};

use crate::lineformat::{comment_body, is_blank, split_quoted_fields};

/// Informational grouping for a decorator, taken from the comment header the
/// decorator appeared under. Carried for provenance only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecoratorCategory {
    /// Bond order constraints.
    BondOrder,
    /// Explicit neighbour counts.
    Adjacency,
    /// Explicit connection degree.
    Degree,
    /// Total bond valence.
    Valence,
    /// Attached hydrogen counts.
    HCount,
    /// Formal charge.
    Charge,
    /// Aromatic versus aliphatic character.
    Aromaticity,
}

impl DecoratorCategory {
    /// Parses a comment header into a category, tolerating spaces in place
    /// of hyphens.
    pub fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_ascii_lowercase().replace(' ', "-").as_str() {
            "bond-order" => Some(Self::BondOrder),
            "adjacency" => Some(Self::Adjacency),
            "degree" => Some(Self::Degree),
            "valence" => Some(Self::Valence),
            "h-count" => Some(Self::HCount),
            "charge" => Some(Self::Charge),
            "aromaticity" => Some(Self::Aromaticity),
            _ => None,
        }
    }
}

/// Composition rule obeyed by a vocabulary's fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VocabularyKind {
    /// Bracketed atom-bearing fragments composed with a logical AND.
    Simple,
    /// Bare property fragments composed positionally, several per proposal.
    Combinatorial,
}

/// A single decorator: a pattern fragment plus its human-readable token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decorator {
    /// Pattern fragment combined with a parent pattern.
    pub fragment: String,
    /// Whitespace-free token used to build composite type names.
    pub token: String,
    /// Category header the decorator appeared under, if recognised.
    pub category: Option<DecoratorCategory>,
}

/// An immutable, ordered decorator vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecoratorVocabulary {
    kind: VocabularyKind,
    decorators: Vec<Decorator>,
}

impl DecoratorVocabulary {
    /// Parses a vocabulary from a line-oriented source.
    ///
    /// Comment lines (`%`) are ignored except that a comment naming a known
    /// category sets the category recorded on subsequent entries. Every other
    /// non-blank line must split into exactly two non-empty fields, fragment
    /// first; single quotes protect embedded whitespace in the fragment.
    pub fn parse(source: &str, kind: VocabularyKind) -> Result<Self, AtysError> {
        let mut decorators: Vec<Decorator> = Vec::new();
        let mut category = None;
        for (index, line) in source.lines().enumerate() {
            if is_blank(line) {
                continue;
            }
            if let Some(body) = comment_body(line) {
                if let Some(parsed) = DecoratorCategory::from_header(body) {
                    category = Some(parsed);
                }
                continue;
            }
            let fields = split_quoted_fields(line).map_err(|code| {
                AtysError::MalformedDecorator(
                    ErrorInfo::new(code, "decorator line has an unterminated quote")
                        .with_context("line", (index + 1).to_string()),
                )
            })?;
            if fields.len() != 2 {
                return Err(AtysError::MalformedDecorator(
                    ErrorInfo::new("field-count", "expected exactly two fields")
                        .with_context("line", (index + 1).to_string())
                        .with_context("fields", fields.len().to_string()),
                ));
            }
            let fragment = fields[0].clone();
            let token = fields[1].clone();
            if fragment.is_empty() || token.is_empty() {
                return Err(AtysError::MalformedDecorator(
                    ErrorInfo::new("empty-field", "fragment and token must be non-empty")
                        .with_context("line", (index + 1).to_string()),
                ));
            }
            if token.chars().any(char::is_whitespace) {
                return Err(AtysError::MalformedDecorator(
                    ErrorInfo::new("token-whitespace", "token must not contain whitespace")
                        .with_context("line", (index + 1).to_string())
                        .with_context("token", token),
                ));
            }
            if decorators.iter().any(|existing| existing.token == token) {
                return Err(AtysError::MalformedDecorator(
                    ErrorInfo::new("duplicate-token", "token already defined in this vocabulary")
                        .with_context("line", (index + 1).to_string())
                        .with_context("token", token),
                ));
            }
            decorators.push(Decorator {
                fragment,
                token,
                category,
            });
        }
        Ok(Self { kind, decorators })
    }

    /// Returns the composition rule the vocabulary obeys.
    pub fn kind(&self) -> VocabularyKind {
        self.kind
    }

    /// Returns the decorators in file order.
    pub fn decorators(&self) -> &[Decorator] {
        &self.decorators
    }

    /// Returns the decorator at the given position.
    pub fn get(&self, index: usize) -> Option<&Decorator> {
        self.decorators.get(index)
    }

    /// Number of decorators in the vocabulary.
    pub fn len(&self) -> usize {
        self.decorators.len()
    }

    /// Whether the vocabulary holds no decorators.
    pub fn is_empty(&self) -> bool {
        self.decorators.is_empty()
    }
}
