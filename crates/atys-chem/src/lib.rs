#![deny(missing_docs)]

//! Chemistry-side data model for the ATYS sampler: decorator vocabularies,
//! the ordered atom-type hierarchy, a lightweight molecule representation,
//! and a property-based pattern matcher.

mod hierarchy;
mod lineformat;
mod matcher;
mod molecule;
mod vocabulary;

pub use hierarchy::{combine_pattern, AtomType, Hierarchy};
pub use matcher::{Matcher, PropertyMatcher};
pub use molecule::{Atom, Bond, Molecule, MoleculeSet};
pub use vocabulary::{Decorator, DecoratorCategory, DecoratorVocabulary, VocabularyKind};

/// Bundled vocabulary and base-type sources used by tests and demos.
pub mod data {
    /// Simple-decorator vocabulary: bracketed fragments composed with `&`.
    pub const SIMPLE_DECORATORS: &str = include_str!("../data/decorators-simple.smarts");
    /// Combinatorial-decorator vocabulary: bare fragments composed positionally.
    pub const COMBINATORIAL_DECORATORS: &str =
        include_str!("../data/decorators-combinatorial.smarts");
    /// Elemental base types seeding the hierarchy.
    pub const BASE_TYPES: &str = include_str!("../data/basetypes.smarts");
}
