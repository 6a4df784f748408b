//! The ordered atom-type hierarchy: an append-only sequence with an
//! immutable base-type prefix. Precedence is positional, so no tree
//! structure is kept despite the name.

use atys_core::errors::ErrorInfo;
use atys_core::AtysError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::lineformat::{comment_body, is_blank, quote_field, split_quoted_fields};

/// A single atom-type record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomType {
    /// Full pattern string matched against atoms.
    pub pattern: String,
    /// Human-readable name, unique within a hierarchy.
    pub name: String,
    /// Name of the parent type this record was derived from, if any.
    pub parent: Option<String>,
    /// Decorator tokens applied on top of the parent, in application order.
    pub decorators: Vec<String>,
    /// Base types seed the hierarchy and are never removable.
    pub is_base: bool,
}

impl AtomType {
    /// Creates a base type.
    pub fn base(pattern: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            name: name.into(),
            parent: None,
            decorators: Vec::new(),
            is_base: true,
        }
    }

    /// Creates a type derived from `parent` with the given composite pattern
    /// and the decorator tokens that produced it.
    pub fn derived(
        parent: &AtomType,
        pattern: impl Into<String>,
        name: impl Into<String>,
        decorator_tokens: Vec<String>,
    ) -> Self {
        let mut decorators = parent.decorators.clone();
        decorators.extend(decorator_tokens);
        Self {
            pattern: pattern.into(),
            name: name.into(),
            parent: Some(parent.name.clone()),
            decorators,
            is_base: false,
        }
    }

    /// Number of decorators between this type and its base ancestor.
    pub fn depth(&self) -> usize {
        self.decorators.len()
    }
}

/// An ordered sequence of atom types. Base types occupy a fixed prefix;
/// accepted births are appended at the end. All mutating operations return a
/// new value so a rejected proposal can be discarded without bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    types: Vec<AtomType>,
    base_len: usize,
}

impl Hierarchy {
    /// Parses base types from a line-oriented source: `%` comments and blank
    /// lines are ignored, other lines hold exactly two fields (pattern then
    /// name, single quotes protecting embedded whitespace).
    pub fn load_base_types(source: &str) -> Result<Self, AtysError> {
        let mut types: Vec<AtomType> = Vec::new();
        for (index, line) in source.lines().enumerate() {
            if is_blank(line) || comment_body(line).is_some() {
                continue;
            }
            let fields = split_quoted_fields(line).map_err(|code| {
                AtysError::MalformedType(
                    ErrorInfo::new(code, "type line has an unterminated quote")
                        .with_context("line", (index + 1).to_string()),
                )
            })?;
            if fields.len() != 2 {
                return Err(AtysError::MalformedType(
                    ErrorInfo::new("field-count", "expected exactly two fields")
                        .with_context("line", (index + 1).to_string())
                        .with_context("fields", fields.len().to_string()),
                ));
            }
            let pattern = fields[0].clone();
            let name = fields[1].clone();
            if pattern.is_empty() || name.is_empty() {
                return Err(AtysError::MalformedType(
                    ErrorInfo::new("empty-field", "pattern and name must be non-empty")
                        .with_context("line", (index + 1).to_string()),
                ));
            }
            if types.iter().any(|existing| existing.pattern == pattern) {
                return Err(AtysError::DuplicatePattern(
                    ErrorInfo::new("duplicate-pattern", "pattern already present")
                        .with_context("line", (index + 1).to_string())
                        .with_context("pattern", pattern),
                ));
            }
            if types.iter().any(|existing| existing.name == name) {
                return Err(AtysError::DuplicateName(
                    ErrorInfo::new("duplicate-name", "name already present")
                        .with_context("line", (index + 1).to_string())
                        .with_context("name", name),
                ));
            }
            types.push(AtomType::base(pattern, name));
        }
        let base_len = types.len();
        Ok(Self { types, base_len })
    }

    /// Returns a new hierarchy with `atom_type` appended after all existing
    /// entries. Fails when the pattern string or the name is already present
    /// verbatim; names key removal, assignments, and counts.
    pub fn append(&self, atom_type: AtomType) -> Result<Self, AtysError> {
        if self.contains_pattern(&atom_type.pattern) {
            return Err(AtysError::DuplicatePattern(
                ErrorInfo::new("duplicate-pattern", "pattern already present")
                    .with_context("pattern", atom_type.pattern),
            ));
        }
        if self.get(&atom_type.name).is_some() {
            return Err(AtysError::DuplicateName(
                ErrorInfo::new("duplicate-name", "name already present")
                    .with_context("name", atom_type.name),
            ));
        }
        let mut next = self.clone();
        next.types.push(atom_type);
        Ok(next)
    }

    /// Returns a new hierarchy without the named type. Base types are never
    /// removable; the remaining order is preserved.
    pub fn remove(&self, name: &str) -> Result<Self, AtysError> {
        let position = self
            .types
            .iter()
            .position(|atom_type| atom_type.name == name)
            .ok_or_else(|| {
                AtysError::NotFound(
                    ErrorInfo::new("type-missing", "no type with the requested name")
                        .with_context("name", name),
                )
            })?;
        if self.types[position].is_base {
            return Err(AtysError::BaseTypeImmutable(
                ErrorInfo::new("base-type", "base types cannot be removed")
                    .with_context("name", name),
            ));
        }
        let mut next = self.clone();
        next.types.remove(position);
        Ok(next)
    }

    /// Returns the types in precedence order. Precedence IS storage order:
    /// the base prefix first, then accepted births in acceptance order.
    pub fn match_order(&self) -> &[AtomType] {
        &self.types
    }

    /// Number of base types at the head of the sequence.
    pub fn base_len(&self) -> usize {
        self.base_len
    }

    /// Total number of types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the hierarchy holds no types.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns the non-base types in storage order.
    pub fn non_base(&self) -> &[AtomType] {
        &self.types[self.base_len..]
    }

    /// Whether the exact pattern string is already present.
    pub fn contains_pattern(&self, pattern: &str) -> bool {
        self.types.iter().any(|atom_type| atom_type.pattern == pattern)
    }

    /// Looks up a type by name.
    pub fn get(&self, name: &str) -> Option<&AtomType> {
        self.types.iter().find(|atom_type| atom_type.name == name)
    }

    /// Serializes the hierarchy back to the two-field line format, base
    /// types first. Multi-word names are single-quoted so the output parses
    /// back with [`Hierarchy::load_base_types`]'s field rules.
    pub fn serialize(&self) -> String {
        let mut out = String::from("% atom type definitions, precedence order\n");
        for atom_type in &self.types {
            out.push_str(&quote_field(&atom_type.pattern));
            out.push(' ');
            out.push_str(&quote_field(&atom_type.name));
            out.push('\n');
        }
        out
    }

    /// Computes the canonical structural hash over the ordered pattern/name
    /// pairs.
    pub fn canonical_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update((self.types.len() as u64).to_le_bytes());
        hasher.update((self.base_len as u64).to_le_bytes());
        for atom_type in &self.types {
            hasher.update((atom_type.pattern.len() as u64).to_le_bytes());
            hasher.update(atom_type.pattern.as_bytes());
            hasher.update((atom_type.name.len() as u64).to_le_bytes());
            hasher.update(atom_type.name.as_bytes());
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Combines a parent pattern with decorator fragments into a single bracket
/// expression. Fragments join with `&`; once an OR group (`,`) is involved,
/// on either side, the low-precedence `;` conjunction is used instead so the
/// grouping survives.
pub fn combine_pattern(parent: &str, fragments: &[&str]) -> String {
    let mut expr = strip_brackets(parent).to_string();
    for fragment in fragments {
        let inner = strip_brackets(fragment);
        let joiner = if inner.contains(',') || expr.contains(',') || expr.contains(';') {
            ';'
        } else {
            '&'
        };
        expr.push(joiner);
        expr.push_str(inner);
    }
    format!("[{expr}]")
}

fn strip_brackets(pattern: &str) -> &str {
    let trimmed = pattern.trim();
    trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed)
}
