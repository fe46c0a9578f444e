//! Term interpretation against host-side semantic functions.
//!
//! The engine places no constraints on the host value type: [`Semantics`]
//! is generic and its functions are opaque boxed closures receiving the
//! combinator's literal binding and the already-evaluated children.

use cls_common::Atom;
use rustc_hash::FxHashMap;

use crate::enumerate::Term;
use crate::error::SolverError;
use crate::intern::TypeInterner;
use crate::repository::Binding;

/// Host semantic function: `(binding, evaluated-children) -> value`.
pub type SemanticFn<V> = Box<dyn Fn(&Binding, Vec<V>) -> V>;

/// Combinator name → semantic function registry.
pub struct Semantics<V> {
    table: FxHashMap<Atom, SemanticFn<V>>,
}

impl<V> Semantics<V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, name: Atom, function: impl Fn(&Binding, Vec<V>) -> V + 'static) {
        self.table.insert(name, Box::new(function));
    }

    #[must_use]
    pub fn get(&self, name: Atom) -> Option<&SemanticFn<V>> {
        self.table.get(&name)
    }
}

impl<V> Default for Semantics<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for Semantics<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Semantics")
            .field("registered", &self.table.len())
            .finish()
    }
}

/// Evaluate a term bottom-up, calling the semantic function of each node
/// with its binding and evaluated children.
pub fn interpret_term<V>(
    interner: &TypeInterner,
    term: &Term,
    semantics: &Semantics<V>,
) -> Result<V, SolverError> {
    let mut children = Vec::with_capacity(term.args().len());
    for arg in term.args() {
        children.push(interpret_term(interner, arg, semantics)?);
    }
    let function =
        semantics
            .get(term.combinator())
            .ok_or_else(|| SolverError::UnknownCombinator {
                name: interner.resolve_atom(term.combinator()),
            })?;
    Ok(function(term.binding(), children))
}
