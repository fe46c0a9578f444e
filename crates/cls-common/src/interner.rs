//! String interning for name deduplication.
//!
//! Every name the engine handles (constructor names, combinator names,
//! literal kinds, schema variables) is interned once and referred to by a
//! small copyable handle (`Atom`). Name comparison and hashing become `u32`
//! operations, which matters because the subtype decider compares
//! constructor names in its innermost loop.

use std::cell::RefCell;

use rustc_hash::FxHashMap;

/// Interned string handle.
///
/// Two `Atom`s are equal iff they were interned from equal strings in the
/// same [`Interner`]. Atoms from different interners must not be mixed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    /// Raw index into the interner's string table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Append-only string interner.
///
/// Interning goes through a `RefCell` so the interner can be shared by
/// reference; the table only ever grows and existing atoms stay valid.
#[derive(Debug, Default)]
pub struct Interner {
    map: RefCell<FxHashMap<String, Atom>>,
    strings: RefCell<Vec<String>>,
}

impl Interner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its atom. Idempotent.
    pub fn intern(&self, text: &str) -> Atom {
        if let Some(&atom) = self.map.borrow().get(text) {
            return atom;
        }
        let mut strings = self.strings.borrow_mut();
        let atom = Atom(u32::try_from(strings.len()).expect("interner overflow"));
        strings.push(text.to_owned());
        self.map.borrow_mut().insert(text.to_owned(), atom);
        atom
    }

    /// Resolve an atom back to its string.
    ///
    /// Returns an owned string because the table lives behind a `RefCell`;
    /// resolution only happens on display and error paths.
    #[must_use]
    pub fn resolve(&self, atom: Atom) -> String {
        self.strings.borrow()[atom.index()].clone()
    }

    /// Number of distinct interned strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strings.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strings.borrow().is_empty()
    }
}
