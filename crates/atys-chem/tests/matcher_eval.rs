use atys_chem::{Atom, Matcher, Molecule, PropertyMatcher};
use atys_core::{AtomId, AtysError, MoleculeId};

/// Ethanol-like fixture: CH3-CH2-OH plus a charged oxygen variant.
fn sample_molecule() -> Molecule {
    let mut molecule = Molecule::new(MoleculeId::from_raw(0));
    let c0 = molecule.add_atom(Atom::new(6).with_hydrogens(3));
    let c1 = molecule.add_atom(Atom::new(6).with_hydrogens(2));
    let o2 = molecule.add_atom(Atom::new(8).with_hydrogens(1));
    let o3 = molecule.add_atom(Atom::new(8).with_charge(-1));
    molecule.add_bond(c0, c1, 1).unwrap();
    molecule.add_bond(c1, o2, 1).unwrap();
    molecule.add_bond(c1, o3, 1).unwrap();
    molecule
}

fn raw_matches(pattern: &str) -> Vec<u32> {
    let matcher = PropertyMatcher::new();
    matcher
        .matching_atoms(pattern, &sample_molecule())
        .unwrap()
        .into_iter()
        .map(|id| id.as_raw())
        .collect()
}

#[test]
fn wildcard_matches_every_atom() {
    assert_eq!(raw_matches("[*]"), [0, 1, 2, 3]);
}

#[test]
fn atomic_number_primitive() {
    assert_eq!(raw_matches("[#6]"), [0, 1]);
    assert_eq!(raw_matches("[#8]"), [2, 3]);
    assert!(raw_matches("[#7]").is_empty());
}

#[test]
fn degree_and_connectivity_primitives() {
    // c0 has one explicit bond, three implicit hydrogens.
    assert_eq!(raw_matches("[D1]"), [0, 2, 3]);
    assert_eq!(raw_matches("[#6&D1]"), [0]);
    assert_eq!(raw_matches("[#6&X4]"), [0]);
    assert_eq!(raw_matches("[X2]"), [2]);
}

#[test]
fn hcount_valence_and_charge_primitives() {
    assert_eq!(raw_matches("[H3]"), [0]);
    assert_eq!(raw_matches("[H]"), [2]);
    assert_eq!(raw_matches("[v4]"), [0]);
    assert_eq!(raw_matches("[v5]"), [1]);
    assert_eq!(raw_matches("[-1]"), [3]);
    assert_eq!(raw_matches("[#8&+0]"), [2]);
}

#[test]
fn aromaticity_and_negation() {
    let mut molecule = Molecule::new(MoleculeId::from_raw(1));
    molecule.add_atom(Atom::new(6).aromatic());
    molecule.add_atom(Atom::new(6));
    let matcher = PropertyMatcher::new();
    let aromatic = matcher.matching_atoms("[a]", &molecule).unwrap();
    let aliphatic = matcher.matching_atoms("[A]", &molecule).unwrap();
    let negated = matcher.matching_atoms("[!a]", &molecule).unwrap();
    assert_eq!(aromatic.len(), 1);
    assert!(aromatic.contains(&AtomId::from_raw(0)));
    assert_eq!(aliphatic, negated);
}

#[test]
fn or_groups_and_low_precedence_conjunction() {
    assert_eq!(raw_matches("[X1,X2]"), [2, 3]);
    assert_eq!(raw_matches("[#8;X2,X4]"), [2]);
    assert_eq!(raw_matches("[#6,#8;D1]"), [0, 2, 3]);
}

#[test]
fn matching_is_deterministic() {
    let matcher = PropertyMatcher::new();
    let molecule = sample_molecule();
    let first = matcher.matching_atoms("[#6&D1]", &molecule).unwrap();
    let second = matcher.matching_atoms("[#6&D1]", &molecule).unwrap();
    assert_eq!(first, second);
}

#[test]
fn unparsable_patterns_are_matcher_errors() {
    let matcher = PropertyMatcher::new();
    let molecule = sample_molecule();
    for (pattern, code) in [
        ("#6", "missing-brackets"),
        ("[]", "empty-expression"),
        ("[Q4]", "bad-primitive"),
        ("[#x]", "bad-number"),
        ("[+200]", "bad-number"),
        ("[-999]", "bad-number"),
        ("[#6&]", "empty-primitive"),
    ] {
        let err = matcher.matching_atoms(pattern, &molecule).unwrap_err();
        match err {
            AtysError::Matcher(info) => assert_eq!(info.code, code, "pattern {pattern}"),
            other => panic!("unexpected error for {pattern}: {other}"),
        }
    }
}

#[test]
fn molecule_construction_is_validated() {
    let mut molecule = Molecule::new(MoleculeId::from_raw(2));
    let a = molecule.add_atom(Atom::new(6));
    let b = molecule.add_atom(Atom::new(6));

    let err = molecule.add_bond(a, a, 1).unwrap_err();
    assert!(matches!(err, AtysError::Molecule(_)));

    let err = molecule
        .add_bond(a, AtomId::from_raw(9), 1)
        .unwrap_err();
    assert!(matches!(err, AtysError::Molecule(_)));

    molecule.add_bond(a, b, 2).unwrap();
    let err = molecule.add_bond(b, a, 1).unwrap_err();
    assert!(matches!(err, AtysError::Molecule(_)));
    assert_eq!(molecule.valence(a), 2);
}
