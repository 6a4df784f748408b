//! Structured error types shared across ATYS crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`AtysError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (line numbers, tokens, patterns, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the ATYS sampler.
///
/// Every variant is fatal to the phase that raises it: malformed vocabulary
/// or base-type input aborts loading before any sampling begins, and matcher
/// failures indicate a configuration bug (the proposal engine only composes
/// patterns from fragments that already parsed). In-band chain outcomes such
/// as a zero-match proposal are never represented here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum AtysError {
    /// A decorator vocabulary line could not be parsed.
    #[error("malformed decorator: {0}")]
    MalformedDecorator(ErrorInfo),
    /// A base-type line could not be parsed.
    #[error("malformed type: {0}")]
    MalformedType(ErrorInfo),
    /// A pattern string is already present verbatim in the hierarchy.
    #[error("duplicate pattern: {0}")]
    DuplicatePattern(ErrorInfo),
    /// A type name is already present in the hierarchy. Names key removal,
    /// assignments, and counts, so they must stay unique.
    #[error("duplicate name: {0}")]
    DuplicateName(ErrorInfo),
    /// Attempted removal of a base type.
    #[error("base type immutable: {0}")]
    BaseTypeImmutable(ErrorInfo),
    /// A named type is absent from the hierarchy.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// Molecule construction or lookup errors.
    #[error("molecule error: {0}")]
    Molecule(ErrorInfo),
    /// Pattern matcher failures (unparsable pattern reaching the matcher).
    #[error("matcher error: {0}")]
    Matcher(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl AtysError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            AtysError::MalformedDecorator(info)
            | AtysError::MalformedType(info)
            | AtysError::DuplicatePattern(info)
            | AtysError::DuplicateName(info)
            | AtysError::BaseTypeImmutable(info)
            | AtysError::NotFound(info)
            | AtysError::Molecule(info)
            | AtysError::Matcher(info)
            | AtysError::Serde(info) => info,
        }
    }
}
