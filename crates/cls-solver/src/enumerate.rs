//! Lazy, fair enumeration of a tree grammar's language.
//!
//! [`enumerate_terms`] yields terms in ascending size (node count); within a
//! size, productions apply in grammar order and argument size splits in
//! lexicographic order. The stream is deterministic, every finite term
//! appears at its size (fairness), and infinite languages are never
//! materialized: one size layer is computed per demand, memoized per
//! (key, size) and shared through `Rc`.
//!
//! Finite languages terminate the stream: after pruning, a reachable cycle
//! of inhabited keys can always be pumped, so the language is finite exactly
//! when the reachable productive subgrammar is acyclic, and then a maximum
//! term size exists and bounds the sweep.

use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use cls_common::Atom;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::{SmallVec, smallvec};

use crate::grammar::TreeGrammar;
use crate::intern::TypeInterner;
use crate::repository::Binding;
use crate::types::TypeId;

/// An applicative term: a combinator, the literal binding it was
/// instantiated at, and one sub-term per argument.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Term {
    combinator: Atom,
    binding: Binding,
    args: Vec<Rc<Term>>,
    size: usize,
}

impl Term {
    #[must_use]
    pub fn new(combinator: Atom, binding: Binding, args: Vec<Rc<Term>>) -> Self {
        let size = 1 + args.iter().map(|arg| arg.size).sum::<usize>();
        Self {
            combinator,
            binding,
            args,
            size,
        }
    }

    #[must_use]
    pub fn combinator(&self) -> Atom {
        self.combinator
    }

    #[must_use]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    #[must_use]
    pub fn args(&self) -> &[Rc<Term>] {
        &self.args
    }

    /// Node count.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of nodes (this one included) whose combinator is `name`.
    #[must_use]
    pub fn count_combinator(&self, name: Atom) -> usize {
        let own = usize::from(self.combinator == name);
        own + self
            .args
            .iter()
            .map(|arg| arg.count_combinator(name))
            .sum::<usize>()
    }

    /// Display adapter printing `name(arg, …)` applications.
    #[must_use]
    pub fn display<'a>(&'a self, interner: &'a TypeInterner) -> TermDisplay<'a> {
        TermDisplay {
            interner,
            term: self,
        }
    }
}

pub struct TermDisplay<'a> {
    interner: &'a TypeInterner,
    term: &'a Term,
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.interner.resolve_atom(self.term.combinator))?;
        if !self.term.args.is_empty() {
            f.write_str("(")?;
            for (i, arg) in self.term.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg.display(self.interner))?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Enumerate the language of `grammar` at `start`, lazily and fairly.
///
/// Dropping the stream cancels enumeration; nothing is computed past the
/// last `next()`.
#[must_use]
pub fn enumerate_terms(grammar: &TreeGrammar, start: TypeId) -> TermStream<'_> {
    let min_sizes = compute_min_sizes(grammar);
    let size_bound = compute_size_bound(grammar, start, &min_sizes);
    TermStream {
        grammar,
        start,
        min_sizes,
        size_bound,
        memo: FxHashMap::default(),
        size: 0,
        pending: VecDeque::new(),
    }
}

/// Lazy term stream over a grammar; see [`enumerate_terms`].
pub struct TermStream<'g> {
    grammar: &'g TreeGrammar,
    start: TypeId,
    /// Minimum term size per inhabited key; uninhabited keys are absent.
    min_sizes: FxHashMap<TypeId, usize>,
    /// Maximum term size when the language is finite.
    size_bound: Option<usize>,
    memo: FxHashMap<(TypeId, usize), Rc<Vec<Rc<Term>>>>,
    size: usize,
    pending: VecDeque<Rc<Term>>,
}

impl Iterator for TermStream<'_> {
    type Item = Rc<Term>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(term) = self.pending.pop_front() {
                return Some(term);
            }
            self.size += 1;
            if let Some(bound) = self.size_bound {
                if self.size > bound {
                    return None;
                }
            }
            self.advance_level(self.size);
            if let Some(terms) = self.memo.get(&(self.start, self.size)) {
                self.pending.extend(terms.iter().cloned());
            }
        }
    }
}

impl TermStream<'_> {
    /// Compute the exact-size-`n` term lists of every key. Size layers below
    /// `n` are already memoized, so this never recurses.
    fn advance_level(&mut self, n: usize) {
        let keys: Vec<TypeId> = self.grammar.keys().collect();
        for key in keys {
            let terms = self.terms_at(key, n);
            self.memo.insert((key, n), Rc::new(terms));
        }
    }

    fn terms_at(&self, key: TypeId, n: usize) -> Vec<Rc<Term>> {
        let Some(&min) = self.min_sizes.get(&key) else {
            return Vec::new();
        };
        if n < min {
            return Vec::new();
        }
        let mut out: Vec<Rc<Term>> = Vec::new();
        let mut seen: FxHashSet<Rc<Term>> = FxHashSet::default();
        for production in self.grammar.productions(key) {
            if production.args().is_empty() {
                if n == 1 {
                    let term = Rc::new(Term::new(
                        production.combinator(),
                        production.binding().clone(),
                        Vec::new(),
                    ));
                    if seen.insert(Rc::clone(&term)) {
                        out.push(term);
                    }
                }
                continue;
            }
            let Some(mins) = production
                .args()
                .iter()
                .map(|arg| self.min_sizes.get(arg).copied())
                .collect::<Option<SmallVec<[usize; 4]>>>()
            else {
                // An uninhabited argument: the production derives nothing.
                continue;
            };
            for split in compositions(n - 1, &mins) {
                let mut lists: SmallVec<[Rc<Vec<Rc<Term>>>; 4]> = smallvec![];
                let mut viable = true;
                for (&arg, &part) in production.args().iter().zip(&split) {
                    match self.memo.get(&(arg, part)) {
                        Some(terms) if !terms.is_empty() => lists.push(Rc::clone(terms)),
                        _ => {
                            viable = false;
                            break;
                        }
                    }
                }
                if !viable {
                    continue;
                }
                cross_product(production.combinator(), production.binding(), &lists, |term| {
                    if seen.insert(Rc::clone(&term)) {
                        out.push(term);
                    }
                });
            }
        }
        out
    }
}

/// Odometer over the argument term lists, rightmost position fastest.
fn cross_product(
    combinator: Atom,
    binding: &Binding,
    lists: &[Rc<Vec<Rc<Term>>>],
    mut emit: impl FnMut(Rc<Term>),
) {
    let mut indices = vec![0usize; lists.len()];
    loop {
        let args: Vec<Rc<Term>> = lists
            .iter()
            .zip(&indices)
            .map(|(list, &i)| Rc::clone(&list[i]))
            .collect();
        emit(Rc::new(Term::new(combinator, binding.clone(), args)));

        let mut position = lists.len();
        loop {
            if position == 0 {
                return;
            }
            position -= 1;
            indices[position] += 1;
            if indices[position] < lists[position].len() {
                break;
            }
            indices[position] = 0;
        }
    }
}

/// Minimum term size of every inhabited key, by fixpoint iteration.
fn compute_min_sizes(grammar: &TreeGrammar) -> FxHashMap<TypeId, usize> {
    let mut min_sizes: FxHashMap<TypeId, usize> = FxHashMap::default();
    loop {
        let mut changed = false;
        for key in grammar.keys() {
            for production in grammar.productions(key) {
                let mut total = 1usize;
                let mut known = true;
                for arg in production.args() {
                    match min_sizes.get(arg) {
                        Some(&size) => total += size,
                        None => {
                            known = false;
                            break;
                        }
                    }
                }
                if !known {
                    continue;
                }
                let best = min_sizes.entry(key).or_insert(usize::MAX);
                if total < *best {
                    *best = total;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }
    min_sizes
}

#[derive(Clone, Copy)]
enum VisitState {
    Visiting,
    Done(usize),
}

/// Maximum term size at `start`, or `None` when the language is infinite
/// (a cycle of inhabited keys is reachable through productive productions).
fn compute_size_bound(
    grammar: &TreeGrammar,
    start: TypeId,
    min_sizes: &FxHashMap<TypeId, usize>,
) -> Option<usize> {
    if !min_sizes.contains_key(&start) {
        // Uninhabited start: the stream is empty.
        return Some(0);
    }
    let mut states: FxHashMap<TypeId, VisitState> = FxHashMap::default();
    max_term_size(grammar, start, min_sizes, &mut states)
}

fn max_term_size(
    grammar: &TreeGrammar,
    key: TypeId,
    min_sizes: &FxHashMap<TypeId, usize>,
    states: &mut FxHashMap<TypeId, VisitState>,
) -> Option<usize> {
    match states.get(&key) {
        Some(VisitState::Visiting) => return None,
        Some(VisitState::Done(size)) => return Some(*size),
        None => {}
    }
    states.insert(key, VisitState::Visiting);
    let mut max = 0usize;
    for production in grammar.productions(key) {
        if production
            .args()
            .iter()
            .any(|arg| !min_sizes.contains_key(arg))
        {
            continue;
        }
        let mut total = 1usize;
        for &arg in production.args() {
            total += max_term_size(grammar, arg, min_sizes, states)?;
        }
        max = max.max(total);
    }
    states.insert(key, VisitState::Done(max));
    Some(max)
}

/// Ordered compositions of `total` into one part per entry of `mins`, each
/// part at least its minimum; lexicographically ascending.
fn compositions(total: usize, mins: &[usize]) -> Vec<SmallVec<[usize; 4]>> {
    let mut out = Vec::new();
    let mut current: SmallVec<[usize; 4]> = smallvec![];
    compose_into(total, mins, &mut current, &mut out);
    out
}

fn compose_into(
    total: usize,
    mins: &[usize],
    current: &mut SmallVec<[usize; 4]>,
    out: &mut Vec<SmallVec<[usize; 4]>>,
) {
    match mins.split_first() {
        None => {
            if total == 0 {
                out.push(current.clone());
            }
        }
        Some((&min, rest)) => {
            let reserved: usize = rest.iter().sum();
            if total < min + reserved {
                return;
            }
            for part in min..=(total - reserved) {
                current.push(part);
                compose_into(total - part, rest, current, out);
                current.pop();
            }
        }
    }
}
