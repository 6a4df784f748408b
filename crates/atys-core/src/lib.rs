#![deny(missing_docs)]

//! Core error, randomness, and identifier types for the ATYS atom-type
//! sampler. Downstream crates hold the chemistry data model (`atys-chem`)
//! and the RJMCMC kernel (`atys-mcmc`); this crate carries only the shared
//! vocabulary they both speak.

use serde::{Deserialize, Serialize};

pub mod errors;
pub mod rng;

pub use errors::{AtysError, ErrorInfo};
pub use rng::{derive_substream_seed, RngHandle};

/// Identifier for a molecule within a working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MoleculeId(u32);

impl MoleculeId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}

/// Identifier for an atom within a molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AtomId(u32);

impl AtomId {
    /// Creates a new identifier from its raw integer representation.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw integer representation of the identifier.
    pub fn as_raw(&self) -> u32 {
        self.0
    }
}
