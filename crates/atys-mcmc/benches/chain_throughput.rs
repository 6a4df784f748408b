use atys_chem::{
    Atom, DecoratorVocabulary, Hierarchy, Molecule, MoleculeSet, PropertyMatcher, VocabularyKind,
};
use atys_core::MoleculeId;
use criterion::{criterion_group, criterion_main, Criterion};

use atys_mcmc::{run, RunConfig};

fn sample_molecules() -> MoleculeSet {
    let mut set = MoleculeSet::new();
    for raw in 0..8u32 {
        // Linear carbon chains terminated by an oxygen.
        let mut molecule = Molecule::new(MoleculeId::from_raw(raw));
        let carbons: Vec<_> = (0..5)
            .map(|_| molecule.add_atom(Atom::new(6).with_hydrogens(2)))
            .collect();
        for pair in carbons.windows(2) {
            molecule.add_bond(pair[0], pair[1], 1).unwrap();
        }
        let oxygen = molecule.add_atom(Atom::new(8).with_hydrogens(1));
        molecule.add_bond(carbons[4], oxygen, 1).unwrap();
        set.push(molecule).unwrap();
    }
    set
}

fn bench_chain(c: &mut Criterion) {
    let base = Hierarchy::load_base_types("[#6] carbon\n[#8] oxygen\n").unwrap();
    let vocabulary = DecoratorVocabulary::parse(
        "[D1] degree-1\n[D2] degree-2\n[H1] hydrogens-1\n[H2] hydrogens-2\n",
        VocabularyKind::Simple,
    )
    .unwrap();
    let molecules = sample_molecules();
    let mut config = RunConfig::default();
    config.iterations = 32;
    config.output.run_directory = None;

    c.bench_function("mcmc_chain", |b| {
        b.iter(|| {
            let _ = run(&config, 42, &base, &vocabulary, &molecules, &PropertyMatcher).unwrap();
        })
    });
}

criterion_group!(benches, bench_chain);
criterion_main!(benches);
