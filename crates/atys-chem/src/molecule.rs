//! Minimal molecule representation exposing the per-atom properties the
//! bundled pattern matcher evaluates. The sampler only ever reads molecules.

use atys_core::errors::ErrorInfo;
use atys_core::{AtomId, AtysError, MoleculeId};
use serde::{Deserialize, Serialize};

/// A single atom with its locally stored properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    /// Atomic number of the element.
    pub atomic_number: u8,
    /// Whether the atom belongs to an aromatic system.
    pub aromatic: bool,
    /// Formal charge.
    pub formal_charge: i8,
    /// Implicit hydrogen count.
    pub hydrogens: u8,
}

impl Atom {
    /// Creates a neutral, aliphatic atom with no implicit hydrogens.
    pub fn new(atomic_number: u8) -> Self {
        Self {
            atomic_number,
            aromatic: false,
            formal_charge: 0,
            hydrogens: 0,
        }
    }

    /// Sets the implicit hydrogen count.
    pub fn with_hydrogens(mut self, hydrogens: u8) -> Self {
        self.hydrogens = hydrogens;
        self
    }

    /// Sets the formal charge.
    pub fn with_charge(mut self, charge: i8) -> Self {
        self.formal_charge = charge;
        self
    }

    /// Marks the atom as aromatic.
    pub fn aromatic(mut self) -> Self {
        self.aromatic = true;
        self
    }
}

/// A bond between two atoms of the same molecule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bond {
    /// First endpoint.
    pub a: AtomId,
    /// Second endpoint.
    pub b: AtomId,
    /// Integer bond order.
    pub order: u8,
}

/// An immutable-after-construction molecule: atoms plus bonds, with degree,
/// connectivity, and valence derived on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Molecule {
    id: MoleculeId,
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl Molecule {
    /// Creates an empty molecule with the given identifier.
    pub fn new(id: MoleculeId) -> Self {
        Self {
            id,
            atoms: Vec::new(),
            bonds: Vec::new(),
        }
    }

    /// Adds an atom and returns its identifier.
    pub fn add_atom(&mut self, atom: Atom) -> AtomId {
        let id = AtomId::from_raw(self.atoms.len() as u32);
        self.atoms.push(atom);
        id
    }

    /// Adds a bond between two existing, distinct atoms.
    pub fn add_bond(&mut self, a: AtomId, b: AtomId, order: u8) -> Result<(), AtysError> {
        if a == b {
            return Err(AtysError::Molecule(
                ErrorInfo::new("self-bond", "an atom cannot bond to itself")
                    .with_context("atom", a.as_raw().to_string()),
            ));
        }
        for endpoint in [a, b] {
            if endpoint.as_raw() as usize >= self.atoms.len() {
                return Err(AtysError::Molecule(
                    ErrorInfo::new("atom-missing", "bond endpoint is not a known atom")
                        .with_context("atom", endpoint.as_raw().to_string()),
                ));
            }
        }
        if self.bonds.iter().any(|bond| {
            (bond.a == a && bond.b == b) || (bond.a == b && bond.b == a)
        }) {
            return Err(AtysError::Molecule(
                ErrorInfo::new("duplicate-bond", "bond already present")
                    .with_context("a", a.as_raw().to_string())
                    .with_context("b", b.as_raw().to_string()),
            ));
        }
        self.bonds.push(Bond { a, b, order });
        Ok(())
    }

    /// Returns the molecule identifier.
    pub fn id(&self) -> MoleculeId {
        self.id
    }

    /// Number of atoms in the molecule.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Iterates over atoms with their identifiers.
    pub fn atoms(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms
            .iter()
            .enumerate()
            .map(|(index, atom)| (AtomId::from_raw(index as u32), atom))
    }

    /// Looks up an atom by identifier.
    pub fn atom(&self, id: AtomId) -> Result<&Atom, AtysError> {
        self.atoms.get(id.as_raw() as usize).ok_or_else(|| {
            AtysError::Molecule(
                ErrorInfo::new("atom-missing", "no atom with the requested id")
                    .with_context("atom", id.as_raw().to_string())
                    .with_context("molecule", self.id.as_raw().to_string()),
            )
        })
    }

    /// Number of explicit bonds touching the atom.
    pub fn degree(&self, id: AtomId) -> usize {
        self.bonds
            .iter()
            .filter(|bond| bond.a == id || bond.b == id)
            .count()
    }

    /// Total connectivity: explicit bonds plus implicit hydrogens.
    pub fn connectivity(&self, id: AtomId) -> usize {
        let hydrogens = self
            .atoms
            .get(id.as_raw() as usize)
            .map(|atom| atom.hydrogens as usize)
            .unwrap_or(0);
        self.degree(id) + hydrogens
    }

    /// Total bond valence: summed explicit bond orders plus implicit
    /// hydrogens.
    pub fn valence(&self, id: AtomId) -> usize {
        let explicit: usize = self
            .bonds
            .iter()
            .filter(|bond| bond.a == id || bond.b == id)
            .map(|bond| bond.order as usize)
            .sum();
        let hydrogens = self
            .atoms
            .get(id.as_raw() as usize)
            .map(|atom| atom.hydrogens as usize)
            .unwrap_or(0);
        explicit + hydrogens
    }
}

/// The externally owned working set of molecules. The sampler reads it
/// during reparameterization and never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoleculeSet {
    molecules: Vec<Molecule>,
}

impl MoleculeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a molecule. Identifiers must be unique within the set.
    pub fn push(&mut self, molecule: Molecule) -> Result<(), AtysError> {
        if self.molecules.iter().any(|existing| existing.id() == molecule.id()) {
            return Err(AtysError::Molecule(
                ErrorInfo::new("duplicate-molecule", "molecule id already present")
                    .with_context("molecule", molecule.id().as_raw().to_string()),
            ));
        }
        self.molecules.push(molecule);
        Ok(())
    }

    /// Iterates over the molecules in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Molecule> {
        self.molecules.iter()
    }

    /// Number of molecules in the set.
    pub fn len(&self) -> usize {
        self.molecules.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.molecules.is_empty()
    }

    /// Total number of atoms across the set.
    pub fn total_atoms(&self) -> usize {
        self.molecules.iter().map(Molecule::atom_count).sum()
    }
}
