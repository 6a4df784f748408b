use atys_chem::{combine_pattern, Atom, Matcher, Molecule, PropertyMatcher};
use atys_core::MoleculeId;
use proptest::prelude::*;

fn arbitrary_molecule() -> impl Strategy<Value = Molecule> {
    (
        prop::collection::vec((1u8..=17, 0u8..=3, -1i8..=1, any::<bool>()), 1..8),
        any::<u64>(),
    )
        .prop_map(|(atom_specs, bond_bits)| {
            let mut molecule = Molecule::new(MoleculeId::from_raw(0));
            let ids: Vec<_> = atom_specs
                .into_iter()
                .map(|(atomic_number, hydrogens, charge, aromatic)| {
                    let mut atom = Atom::new(atomic_number)
                        .with_hydrogens(hydrogens)
                        .with_charge(charge);
                    if aromatic {
                        atom = atom.aromatic();
                    }
                    molecule.add_atom(atom)
                })
                .collect();
            // Chain bonds with deterministic pseudo-random orders.
            for (index, window) in ids.windows(2).enumerate() {
                let order = 1 + ((bond_bits >> index) & 1) as u8;
                molecule.add_bond(window[0], window[1], order).unwrap();
            }
            molecule
        })
}

fn arbitrary_fragment() -> impl Strategy<Value = String> {
    prop_oneof![
        (1u8..=17).prop_map(|n| format!("[#{n}]")),
        (1u8..=4).prop_map(|n| format!("[D{n}]")),
        (1u8..=5).prop_map(|n| format!("[X{n}]")),
        (0u8..=3).prop_map(|n| format!("[H{n}]")),
        (1u8..=5).prop_map(|n| format!("[v{n}]")),
        Just("[+1]".to_string()),
        Just("[-1]".to_string()),
        Just("[a]".to_string()),
        Just("[A]".to_string()),
        (1u8..=4, 1u8..=4).prop_map(|(a, b)| format!("[X{a},X{b}]")),
    ]
}

proptest! {
    #[test]
    fn matching_is_deterministic_for_random_inputs(
        molecule in arbitrary_molecule(),
        fragment in arbitrary_fragment(),
    ) {
        let matcher = PropertyMatcher::new();
        let first = matcher.matching_atoms(&fragment, &molecule).unwrap();
        let second = matcher.matching_atoms(&fragment, &molecule).unwrap();
        prop_assert_eq!(&first, &second);
        for atom_id in &first {
            prop_assert!((atom_id.as_raw() as usize) < molecule.atom_count());
        }
    }

    #[test]
    fn composed_patterns_stay_parsable_and_narrow(
        molecule in arbitrary_molecule(),
        parent in arbitrary_fragment(),
        decorations in prop::collection::vec(arbitrary_fragment(), 1..4),
    ) {
        let fragments: Vec<&str> = decorations.iter().map(String::as_str).collect();
        let composed = combine_pattern(&parent, &fragments);
        let matcher = PropertyMatcher::new();

        let parent_matches = matcher.matching_atoms(&parent, &molecule).unwrap();
        let composed_matches = matcher.matching_atoms(&composed, &molecule).unwrap();
        prop_assert!(composed_matches.is_subset(&parent_matches));
    }
}
