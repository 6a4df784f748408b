use std::collections::BTreeMap;

use atys_chem::{Hierarchy, Matcher, MoleculeSet};
use atys_core::{AtomId, AtysError, MoleculeId};
use serde::{Deserialize, Serialize};

/// Per-atom type assignment plus per-type usage counts for a hierarchy and
/// molecule set pair. Produced fresh on every reparameterization pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAssignment {
    /// Assigned type name for every matched atom.
    pub assignments: BTreeMap<(MoleculeId, AtomId), String>,
    /// Number of atoms each type captured across the whole set. Every type
    /// in the hierarchy is present, zero-count types included.
    pub counts: BTreeMap<String, usize>,
    /// Atoms matched by no type at all.
    pub untyped: usize,
}

impl TypeAssignment {
    /// Returns the number of atoms captured by the named type.
    pub fn count(&self, name: &str) -> usize {
        self.counts.get(name).copied().unwrap_or(0)
    }
}

/// Recomputes the full type assignment for the given hierarchy.
///
/// Precedence is most-specific-first: the scan walks `match_order()` from
/// the newest entry back to the base prefix and the first matching type
/// wins. A freshly accepted child therefore immediately captures atoms from
/// its ancestor, while storage stays append-only and base types keep their
/// fixed prefix. Recomputation is complete on every call; no incremental
/// update is attempted.
pub fn reparameterize(
    hierarchy: &Hierarchy,
    molecules: &MoleculeSet,
    matcher: &dyn Matcher,
) -> Result<TypeAssignment, AtysError> {
    let order = hierarchy.match_order();
    let mut counts: BTreeMap<String, usize> = order
        .iter()
        .map(|atom_type| (atom_type.name.clone(), 0))
        .collect();
    let mut assignments = BTreeMap::new();
    let mut untyped = 0usize;

    for molecule in molecules.iter() {
        let mut match_sets = Vec::with_capacity(order.len());
        for atom_type in order {
            match_sets.push(matcher.matching_atoms(&atom_type.pattern, molecule)?);
        }
        for (atom_id, _) in molecule.atoms() {
            let assigned = (0..order.len())
                .rev()
                .find(|&index| match_sets[index].contains(&atom_id));
            match assigned {
                Some(index) => {
                    let name = &order[index].name;
                    assignments.insert((molecule.id(), atom_id), name.clone());
                    if let Some(count) = counts.get_mut(name) {
                        *count += 1;
                    }
                }
                None => untyped += 1,
            }
        }
    }

    Ok(TypeAssignment {
        assignments,
        counts,
        untyped,
    })
}
