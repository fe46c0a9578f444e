//! Subtype environment and decision procedure.
//!
//! [`TypeEnvironment`] declares direct supertype relations on constructor
//! *names*; [`SubtypeJudge`] closes the environment reflexively and
//! transitively at construction and decides `σ ≤ τ` with the multiset
//! procedure: case-analysis on the supertype, unfolding intersections among
//! the subtype candidates, promoting constructor names through the closed
//! environment, contravariant arrow sources, covariant products. Literals
//! and variables are constructor-like atoms equal only to themselves.
//!
//! The judgment is total, reflexive, and transitive; it never fails. The
//! order in which candidates are consumed is irrelevant to the decision.

use cls_common::Atom;
use cls_common::limits::{STACK_PER_GROWTH, STACK_RED_ZONE};
use fixedbitset::FixedBitSet;
use rustc_hash::FxHashMap;
use smallvec::smallvec;

use crate::intern::TypeInterner;
use crate::types::{TypeId, TypeKey, TypeList};

/// Direct supertype declarations on constructor names.
///
/// Only names are related; structural types never appear here. The judge
/// computes the reflexive-transitive closure once.
#[derive(Clone, Debug, Default)]
pub struct TypeEnvironment {
    declared: FxHashMap<Atom, Vec<Atom>>,
}

impl TypeEnvironment {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare direct supertypes of `name`.
    pub fn declare_supertypes(&mut self, name: Atom, supertypes: impl IntoIterator<Item = Atom>) {
        self.declared.entry(name).or_default().extend(supertypes);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Atom, &[Atom])> + '_ {
        self.declared
            .iter()
            .map(|(&name, supers)| (name, supers.as_slice()))
    }
}

/// Reflexive-transitive closure of a [`TypeEnvironment`], one bitset row per
/// known name. Names never declared are only supertypes of themselves.
#[derive(Clone, Debug)]
struct NameClosure {
    index: FxHashMap<Atom, usize>,
    rows: Vec<FixedBitSet>,
}

impl NameClosure {
    fn build(env: &TypeEnvironment) -> Self {
        let mut index: FxHashMap<Atom, usize> = FxHashMap::default();
        let add = |name: Atom, index: &mut FxHashMap<Atom, usize>| {
            let next = index.len();
            index.entry(name).or_insert(next);
        };
        for (name, supers) in env.iter() {
            add(name, &mut index);
            for &sup in supers {
                add(sup, &mut index);
            }
        }

        let n = index.len();
        let mut rows = vec![FixedBitSet::with_capacity(n); n];
        for (i, row) in rows.iter_mut().enumerate() {
            row.insert(i);
        }
        for (name, supers) in env.iter() {
            let i = index[&name];
            for &sup in supers {
                rows[i].insert(index[&sup]);
            }
        }
        // Warshall closure over the bitset rows.
        for k in 0..n {
            let row_k = rows[k].clone();
            for row in rows.iter_mut() {
                if row.contains(k) {
                    row.union_with(&row_k);
                }
            }
        }
        tracing::debug!(names = n, "closed subtype environment");
        Self { index, rows }
    }

    /// Whether constructor name `sub` promotes to `sup`.
    fn promotes(&self, sub: Atom, sup: Atom) -> bool {
        if sub == sup {
            return true;
        }
        match (self.index.get(&sub), self.index.get(&sup)) {
            (Some(&i), Some(&j)) => self.rows[i].contains(j),
            _ => false,
        }
    }
}

/// Subtype decision procedure over a closed environment.
pub struct SubtypeJudge<'a> {
    interner: &'a TypeInterner,
    closure: NameClosure,
}

impl<'a> SubtypeJudge<'a> {
    /// Close `env` and build a judge. The closure is computed once and is
    /// read-only afterwards.
    #[must_use]
    pub fn new(interner: &'a TypeInterner, env: &TypeEnvironment) -> Self {
        Self {
            interner,
            closure: NameClosure::build(env),
        }
    }

    /// Decide whether `sub ≤ sup`.
    #[must_use]
    pub fn is_subtype(&self, sub: TypeId, sup: TypeId) -> bool {
        self.check(smallvec![sub], sup)
    }

    /// `check(Σ, τ)` for a multiset Σ of candidate subtype components.
    ///
    /// Grows the stack on demand: recursion depth is bounded by type size,
    /// which is caller-controlled.
    fn check(&self, candidates: TypeList, sup: TypeId) -> bool {
        stacker::maybe_grow(STACK_RED_ZONE, STACK_PER_GROWTH, || {
            self.check_inner(candidates, sup)
        })
    }

    fn check_inner(&self, mut candidates: TypeList, sup: TypeId) -> bool {
        if self.interner.is_omega(sup) {
            return true;
        }
        match self.interner.key(sup) {
            TypeKey::Ctor {
                name: sup_name,
                arg: sup_arg,
            } => {
                let mut cast: TypeList = smallvec![];
                while let Some(candidate) = candidates.pop() {
                    match self.interner.key(candidate) {
                        TypeKey::Ctor { name, arg } if self.closure.promotes(name, sup_name) => {
                            cast.push(arg);
                        }
                        TypeKey::Intersection { left, right } => {
                            candidates.push(left);
                            candidates.push(right);
                        }
                        _ => {}
                    }
                }
                !cast.is_empty() && self.check(cast, sup_arg)
            }
            TypeKey::Arrow {
                source: sup_source,
                target: sup_target,
            } => {
                let mut cast: TypeList = smallvec![];
                while let Some(candidate) = candidates.pop() {
                    match self.interner.key(candidate) {
                        TypeKey::Arrow { source, target } => {
                            // Contravariant in the source.
                            if self.check(smallvec![sup_source], source) {
                                cast.push(target);
                            }
                        }
                        TypeKey::Intersection { left, right } => {
                            candidates.push(left);
                            candidates.push(right);
                        }
                        _ => {}
                    }
                }
                !cast.is_empty() && self.check(cast, sup_target)
            }
            TypeKey::Product {
                left: sup_left,
                right: sup_right,
            } => {
                let mut cast_left: TypeList = smallvec![];
                let mut cast_right: TypeList = smallvec![];
                while let Some(candidate) = candidates.pop() {
                    match self.interner.key(candidate) {
                        TypeKey::Product { left, right } => {
                            cast_left.push(left);
                            cast_right.push(right);
                        }
                        TypeKey::Intersection { left, right } => {
                            candidates.push(left);
                            candidates.push(right);
                        }
                        _ => {}
                    }
                }
                !cast_left.is_empty()
                    && self.check(cast_left, sup_left)
                    && self.check(cast_right, sup_right)
            }
            TypeKey::Intersection { left, right } => {
                self.check(candidates.clone(), left) && self.check(candidates, right)
            }
            TypeKey::Literal { .. } => {
                // Literals are singleton atoms: equal (hence identical, by
                // interning) on both sides, or nothing.
                self.find_atom(candidates, sup)
            }
            TypeKey::Var { .. } => self.find_atom(candidates, sup),
            TypeKey::Omega => true,
        }
    }

    fn find_atom(&self, mut candidates: TypeList, sup: TypeId) -> bool {
        while let Some(candidate) = candidates.pop() {
            if candidate == sup {
                return true;
            }
            if let TypeKey::Intersection { left, right } = self.interner.key(candidate) {
                candidates.push(left);
                candidates.push(right);
            }
        }
        false
    }

    /// Reduce a set of types to the antichain of its most specific members.
    ///
    /// A candidate is dropped when some retained type is already a subtype
    /// of it; inserting a candidate drops every retained type it is a
    /// subtype of. The result is canonical up to set equality.
    #[must_use]
    pub fn minimize(&self, types: &[TypeId]) -> Vec<TypeId> {
        let mut result: Vec<TypeId> = Vec::new();
        for &ty in types {
            if result.iter().all(|&kept| !self.is_subtype(kept, ty)) {
                result.retain(|&kept| !self.is_subtype(ty, kept));
                result.push(ty);
            }
        }
        result
    }
}

impl std::fmt::Debug for SubtypeJudge<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubtypeJudge")
            .field("names", &self.closure.rows.len())
            .finish()
    }
}
