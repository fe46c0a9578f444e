//! Inhabitation: from a repository and a query type to a tree grammar.
//!
//! The machine is built once per (repository, environment, domains) triple:
//! it enumerates every admissible parameter binding of every combinator,
//! instantiates the schema bodies, and decomposes them into organized arrow
//! paths. [`InhabitationMachine::inhabit`] then saturates a worklist of
//! target types reachable from the query, producing one grammar production
//! per minimal cover of each target.
//!
//! Inhabitation is a pure computation: equal inputs produce equal grammars,
//! whatever the construction interleaving. Saturation terminates when the
//! set of reachable targets closes; repositories with infinite inhabitant
//! languages still close here (the grammar merely becomes cyclic), but a
//! production cap and a cooperative cancellation flag are available for
//! repositories whose *target set* does not close.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cls_common::Atom;
use cls_common::limits::MAX_COVER_PATHS;
use rustc_hash::FxHashSet;
use smallvec::{SmallVec, smallvec};
use tracing::{debug, trace, warn};

use crate::error::SolverError;
use crate::grammar::{Production, TreeGrammar};
use crate::intern::TypeInterner;
use crate::repository::{Binding, LiteralDomains, Repository, admissible_bindings, instantiate};
use crate::subtype::{SubtypeJudge, TypeEnvironment};
use crate::types::{TypeId, TypeKey, TypeList};

/// Resource bounds for saturation.
///
/// Both bounds leave the grammar well-defined; they only flag it as
/// truncated. The cancellation flag is checked at every worklist pop.
#[derive(Clone, Debug, Default)]
pub struct InhabitOptions {
    /// Stop after this many productions in total.
    pub production_cap: Option<usize>,
    /// Cooperative cancellation, set by the caller from outside.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl InhabitOptions {
    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// One organized arrow path of an instantiated combinator body, split at
/// every argument count: `tails[k]` is what remains after consuming the
/// first `k` sources.
struct SpinePath {
    sources: TypeList,
    tails: TypeList,
}

/// One combinator instantiated at one admissible binding.
struct RuleInstance {
    combinator: Atom,
    binding: Binding,
    paths: Vec<SpinePath>,
}

pub struct InhabitationMachine<'a> {
    interner: &'a TypeInterner,
    judge: SubtypeJudge<'a>,
    instances: Vec<RuleInstance>,
    options: InhabitOptions,
    /// Some instantiation exceeded the cover-path cap during construction;
    /// grammars built by this machine are flagged truncated.
    overflow: bool,
}

impl<'a> InhabitationMachine<'a> {
    /// Instantiate the repository against the literal domains and close the
    /// subtype environment.
    ///
    /// Fails only on schemas whose body references an unbound variable.
    pub fn new(
        interner: &'a TypeInterner,
        repository: &Repository,
        env: &TypeEnvironment,
        domains: &LiteralDomains,
    ) -> Result<Self, SolverError> {
        let judge = SubtypeJudge::new(interner, env);
        let mut instances = Vec::new();
        let mut overflow = false;
        for (combinator, schema) in repository.iter() {
            for binding in admissible_bindings(schema, domains) {
                let body = instantiate(interner, schema.body(), &binding)?;
                let mut paths: Vec<SpinePath> = interner
                    .organized(body)
                    .iter()
                    .map(|&path| decompose(interner, path))
                    .collect();
                if paths.len() > MAX_COVER_PATHS {
                    warn!(
                        combinator = %interner.resolve_atom(combinator),
                        paths = paths.len(),
                        cap = MAX_COVER_PATHS,
                        "organized path count exceeds cover cap; truncating"
                    );
                    paths.truncate(MAX_COVER_PATHS);
                    overflow = true;
                }
                if paths.is_empty() {
                    // ω-typed instantiation: contributes no productions.
                    continue;
                }
                instances.push(RuleInstance {
                    combinator,
                    binding,
                    paths,
                });
            }
        }
        debug!(
            combinators = repository.len(),
            instances = instances.len(),
            "combinator rules instantiated"
        );
        Ok(Self {
            interner,
            judge,
            instances,
            options: InhabitOptions::default(),
            overflow,
        })
    }

    #[must_use]
    pub fn with_options(mut self, options: InhabitOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn judge(&self) -> &SubtypeJudge<'a> {
        &self.judge
    }

    /// Build the tree grammar of all inhabitants of `query`.
    #[must_use]
    pub fn inhabit(&self, query: TypeId) -> TreeGrammar {
        let mut grammar = TreeGrammar::new(query);
        // Canonical target representatives in creation order; an arriving
        // target that is mutually a subtype of an existing key merges into
        // that key.
        let mut canon: Vec<TypeId> = vec![query];
        let mut worklist: VecDeque<TypeId> = VecDeque::from([query]);
        let mut enqueued: FxHashSet<TypeId> = FxHashSet::from_iter([query]);
        let mut production_count = 0usize;

        'saturate: while let Some(target) = worklist.pop_front() {
            if self.options.cancelled() {
                debug!("inhabitation cancelled");
                grammar.set_truncated();
                break;
            }
            trace!(ty = %self.interner.display(target), "saturating target");
            for instance in &self.instances {
                let max_arity = instance
                    .paths
                    .iter()
                    .map(|path| path.sources.len())
                    .max()
                    .unwrap_or(0);
                for arity in 0..=max_arity {
                    let paths: SmallVec<[&SpinePath; 8]> = instance
                        .paths
                        .iter()
                        .filter(|path| path.sources.len() >= arity)
                        .collect();
                    if paths.is_empty() {
                        continue;
                    }
                    for mask in self.minimal_covers(&paths, arity, target) {
                        let args = self.cover_args(&paths, mask, arity, &mut canon);
                        let production =
                            Production::new(instance.combinator, args, instance.binding.clone());
                        if grammar.productions(target).contains(&production) {
                            continue;
                        }
                        for &arg in production.args() {
                            grammar.ensure_key(arg);
                            if enqueued.insert(arg) {
                                worklist.push_back(arg);
                            }
                        }
                        grammar.add_production(target, production);
                        production_count += 1;
                        if let Some(cap) = self.options.production_cap {
                            if production_count >= cap {
                                debug!(cap, "production cap reached");
                                grammar.set_truncated();
                                break 'saturate;
                            }
                        }
                    }
                }
            }
        }

        if self.overflow {
            grammar.set_truncated();
        }
        self.prune(&mut grammar);
        debug!(
            keys = grammar.len(),
            productions = grammar.production_count(),
            truncated = grammar.is_truncated(),
            "grammar built"
        );
        grammar
    }

    /// Minimal subsets of `paths` (as bitmasks) whose intersected `arity`-
    /// tails are subtypes of `target`. Masks are explored in ascending
    /// (popcount, value) order; supersets of an accepted mask are redundant
    /// because their argument types are only more constrained.
    fn minimal_covers(&self, paths: &[&SpinePath], arity: usize, target: TypeId) -> Vec<u32> {
        let m = paths.len();
        debug_assert!(m <= MAX_COVER_PATHS);
        let mut masks: Vec<u32> = (1..(1u32 << m)).collect();
        masks.sort_unstable_by_key(|&mask| (mask.count_ones(), mask));

        let mut accepted: Vec<u32> = Vec::new();
        for mask in masks {
            if accepted.iter().any(|&found| mask & found == found) {
                continue;
            }
            let tails: TypeList = selected(paths, mask)
                .map(|path| path.tails[arity])
                .collect();
            let combined = self.interner.intersect_all(&tails);
            if self.judge.is_subtype(combined, target) {
                accepted.push(mask);
            }
        }
        accepted
    }

    /// Pointwise-intersected, canonicalized argument types of a cover.
    fn cover_args(
        &self,
        paths: &[&SpinePath],
        mask: u32,
        arity: usize,
        canon: &mut Vec<TypeId>,
    ) -> TypeList {
        (0..arity)
            .map(|position| {
                let members: TypeList = selected(paths, mask)
                    .map(|path| path.sources[position])
                    .collect();
                self.canonicalize(self.interner.intersect_all(&members), canon)
            })
            .collect()
    }

    /// Merge mutually-subtype targets to the earliest-created representative.
    fn canonicalize(&self, ty: TypeId, canon: &mut Vec<TypeId>) -> TypeId {
        for &existing in canon.iter() {
            if existing == ty {
                return ty;
            }
            if self.judge.is_subtype(ty, existing) && self.judge.is_subtype(existing, ty) {
                trace!(
                    merged = %self.interner.display(ty),
                    into = %self.interner.display(existing),
                    "canonicalized equivalent target"
                );
                return existing;
            }
        }
        canon.push(ty);
        ty
    }

    /// Remove productions referencing dead (uninhabited) targets, to
    /// fixpoint. Keys stay in the grammar; dead ones end up with no
    /// productions.
    fn prune(&self, grammar: &mut TreeGrammar) {
        let keys: Vec<TypeId> = grammar.keys().collect();
        let mut inhabited: FxHashSet<TypeId> = FxHashSet::default();
        loop {
            let mut changed = false;
            for &key in &keys {
                if inhabited.contains(&key) {
                    continue;
                }
                let witnessed = grammar
                    .productions(key)
                    .iter()
                    .any(|production| production.args().iter().all(|arg| inhabited.contains(arg)));
                if witnessed {
                    inhabited.insert(key);
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        let before = grammar.production_count();
        grammar.retain_productions(|production| {
            production.args().iter().all(|arg| inhabited.contains(arg))
        });
        let removed = before - grammar.production_count();
        if removed > 0 {
            debug!(removed, "pruned dead productions");
        }
    }
}

impl std::fmt::Debug for InhabitationMachine<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InhabitationMachine")
            .field("instances", &self.instances.len())
            .field("options", &self.options)
            .finish()
    }
}

/// Iterate the paths a cover mask selects, in path order.
fn selected<'p>(
    paths: &'p [&'p SpinePath],
    mask: u32,
) -> impl Iterator<Item = &'p SpinePath> + 'p {
    paths
        .iter()
        .enumerate()
        .filter(move |&(i, _)| mask & (1 << i) != 0)
        .map(|(_, path)| *path)
}

/// Split an organized arrow path at every argument position.
fn decompose(interner: &TypeInterner, path: TypeId) -> SpinePath {
    let mut sources: TypeList = smallvec![];
    let mut tails: TypeList = smallvec![path];
    let mut current = path;
    while let TypeKey::Arrow { source, target } = interner.key(current) {
        sources.push(source);
        tails.push(target);
        current = target;
    }
    SpinePath { sources, tails }
}

/// One-shot convenience: build a machine and inhabit `query`.
pub fn inhabit(
    interner: &TypeInterner,
    repository: &Repository,
    env: &TypeEnvironment,
    domains: &LiteralDomains,
    query: TypeId,
) -> Result<TreeGrammar, SolverError> {
    Ok(InhabitationMachine::new(interner, repository, env, domains)?.inhabit(query))
}
