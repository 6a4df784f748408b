//! Pattern matching seam. The production matcher is an external
//! cheminformatics engine; [`PropertyMatcher`] implements the bracket
//! expression subset the bundled vocabularies emit, which is enough for
//! tests, benches, and small experiments.

use std::collections::BTreeSet;

use atys_core::errors::ErrorInfo;
use atys_core::{AtomId, AtysError};

use crate::molecule::Molecule;

/// Contract consumed by the reparameterizer: deterministic, side-effect
/// free atom matching for a fixed (pattern, molecule) pair.
pub trait Matcher: Send + Sync {
    /// Returns the atoms of `molecule` matched by `pattern`.
    fn matching_atoms(
        &self,
        pattern: &str,
        molecule: &Molecule,
    ) -> Result<BTreeSet<AtomId>, AtysError>;
}

/// Property-based matcher for bracket expressions.
///
/// Grammar, loosest binding first: `;` conjunction over `,` alternation over
/// `&` conjunction over `!`-negatable primitives. Supported primitives:
/// `*`, `#n` (atomic number), `Dn` (degree), `Xn` (connectivity), `Hn`
/// (hydrogen count), `vn` (valence), `+n`/`-n` (charge, bare sign meaning 1),
/// `a` (aromatic), `A` (aliphatic).
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyMatcher;

impl PropertyMatcher {
    /// Creates a matcher instance.
    pub fn new() -> Self {
        Self
    }
}

impl Matcher for PropertyMatcher {
    fn matching_atoms(
        &self,
        pattern: &str,
        molecule: &Molecule,
    ) -> Result<BTreeSet<AtomId>, AtysError> {
        let compiled = compile(pattern)?;
        let mut matched = BTreeSet::new();
        for (atom_id, _) in molecule.atoms() {
            if compiled.matches(molecule, atom_id) {
                matched.insert(atom_id);
            }
        }
        Ok(matched)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Primitive {
    Any,
    AtomicNumber(u8),
    Degree(u8),
    Connectivity(u8),
    HCount(u8),
    Valence(u8),
    Charge(i8),
    Aromatic,
    Aliphatic,
}

impl Primitive {
    fn holds(&self, molecule: &Molecule, atom_id: AtomId) -> bool {
        // Compilation precedes evaluation, so the atom is known to exist.
        let Ok(atom) = molecule.atom(atom_id) else {
            return false;
        };
        match self {
            Primitive::Any => true,
            Primitive::AtomicNumber(n) => atom.atomic_number == *n,
            Primitive::Degree(n) => molecule.degree(atom_id) == *n as usize,
            Primitive::Connectivity(n) => molecule.connectivity(atom_id) == *n as usize,
            Primitive::HCount(n) => atom.hydrogens == *n,
            Primitive::Valence(n) => molecule.valence(atom_id) == *n as usize,
            Primitive::Charge(c) => atom.formal_charge == *c,
            Primitive::Aromatic => atom.aromatic,
            Primitive::Aliphatic => !atom.aromatic,
        }
    }
}

/// One `!`-negatable primitive inside an `&` conjunction.
#[derive(Debug, Clone, Copy)]
struct Term {
    negated: bool,
    primitive: Primitive,
}

/// Compiled form: outer `;` conjunction of `,` alternations of `&`
/// conjunctions.
#[derive(Debug, Clone)]
struct Compiled {
    clauses: Vec<Vec<Vec<Term>>>,
}

impl Compiled {
    fn matches(&self, molecule: &Molecule, atom_id: AtomId) -> bool {
        self.clauses.iter().all(|alternation| {
            alternation.iter().any(|conjunction| {
                conjunction
                    .iter()
                    .all(|atom| atom.primitive.holds(molecule, atom_id) != atom.negated)
            })
        })
    }
}

fn compile(pattern: &str) -> Result<Compiled, AtysError> {
    let trimmed = pattern.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| {
            AtysError::Matcher(
                ErrorInfo::new("missing-brackets", "pattern must be a bracket expression")
                    .with_context("pattern", pattern),
            )
        })?;
    if inner.is_empty() {
        return Err(AtysError::Matcher(
            ErrorInfo::new("empty-expression", "pattern brackets are empty")
                .with_context("pattern", pattern),
        ));
    }
    let mut clauses = Vec::new();
    for clause in inner.split(';') {
        let mut alternation = Vec::new();
        for term in clause.split(',') {
            let mut conjunction = Vec::new();
            for piece in term.split('&') {
                conjunction.push(parse_primitive(piece, pattern)?);
            }
            alternation.push(conjunction);
        }
        clauses.push(alternation);
    }
    Ok(Compiled { clauses })
}

fn parse_primitive(piece: &str, pattern: &str) -> Result<Term, AtysError> {
    let (negated, body) = match piece.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, piece),
    };
    let bad = |code: &str, message: &str| {
        AtysError::Matcher(
            ErrorInfo::new(code, message)
                .with_context("pattern", pattern)
                .with_context("primitive", piece),
        )
    };
    if body.is_empty() {
        return Err(bad("empty-primitive", "primitive is empty"));
    }
    if !body.is_char_boundary(1) {
        return Err(bad("bad-primitive", "unknown primitive"));
    }
    let (head, digits) = body.split_at(1);
    let primitive = match head {
        "*" if digits.is_empty() => Primitive::Any,
        "#" => Primitive::AtomicNumber(parse_count(digits).ok_or_else(|| {
            bad("bad-number", "atomic number must be a small integer")
        })?),
        "D" => Primitive::Degree(
            parse_count(digits).ok_or_else(|| bad("bad-number", "degree must be an integer"))?,
        ),
        "X" => Primitive::Connectivity(
            parse_count(digits)
                .ok_or_else(|| bad("bad-number", "connectivity must be an integer"))?,
        ),
        "H" => Primitive::HCount(if digits.is_empty() {
            1
        } else {
            parse_count(digits).ok_or_else(|| bad("bad-number", "h-count must be an integer"))?
        }),
        "v" => Primitive::Valence(
            parse_count(digits).ok_or_else(|| bad("bad-number", "valence must be an integer"))?,
        ),
        "+" => Primitive::Charge(if digits.is_empty() {
            1
        } else {
            parse_charge(digits)
                .ok_or_else(|| bad("bad-number", "charge must be a small integer"))?
        }),
        "-" => Primitive::Charge(if digits.is_empty() {
            -1
        } else {
            parse_charge(digits)
                .map(|n| -n)
                .ok_or_else(|| bad("bad-number", "charge must be a small integer"))?
        }),
        "a" if digits.is_empty() => Primitive::Aromatic,
        "A" if digits.is_empty() => Primitive::Aliphatic,
        _ => return Err(bad("bad-primitive", "unknown primitive")),
    };
    Ok(Term { negated, primitive })
}

fn parse_count(digits: &str) -> Option<u8> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Charge magnitudes parse directly into the signed range so an oversized
/// value is rejected instead of wrapping.
fn parse_charge(digits: &str) -> Option<i8> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
