use atys_chem::{Atom, Matcher, Molecule, PropertyMatcher};
use atys_core::MoleculeId;
use criterion::{criterion_group, criterion_main, Criterion};

fn sample_molecule(id: u32, atoms: usize) -> Molecule {
    let mut molecule = Molecule::new(MoleculeId::from_raw(id));
    let ids: Vec<_> = (0..atoms)
        .map(|index| {
            let atomic_number = if index % 4 == 0 { 8 } else { 6 };
            molecule.add_atom(Atom::new(atomic_number).with_hydrogens((index % 3) as u8))
        })
        .collect();
    for window in ids.windows(2) {
        molecule.add_bond(window[0], window[1], 1).unwrap();
    }
    molecule
}

fn bench_matching(c: &mut Criterion) {
    let molecule = sample_molecule(0, 64);
    let matcher = PropertyMatcher::new();

    c.bench_function("match_simple_pattern", |b| {
        b.iter(|| matcher.matching_atoms("[#6&D2]", &molecule).unwrap())
    });

    c.bench_function("match_composite_pattern", |b| {
        b.iter(|| {
            matcher
                .matching_atoms("[#6;X2,X3;H1]", &molecule)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_matching);
criterion_main!(benches);
