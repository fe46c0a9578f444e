//! Combinator repository, parameter model, and schema instantiation.
//!
//! External collaborators supply combinators as `(name, schema)` pairs. A
//! schema is a sequence of literal-valued parameters followed by a body
//! type; parameters draw candidate values from declared finite domains and
//! are filtered by host-side predicates. The engine assumes predicates are
//! pure and never introspects them.

use cls_common::Atom;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::error::SolverError;
use crate::intern::TypeInterner;
use crate::types::{Lit, TypeId, TypeKey};

/// Host-side admissibility predicate over a partial binding.
///
/// The predicate sees every variable bound so far, including the candidate
/// value of the parameter it guards.
pub type Predicate = Box<dyn Fn(&Binding) -> bool>;

/// One literal-valued parameter of a schema.
pub struct Parameter {
    var: Atom,
    kind: Atom,
    predicate: Predicate,
}

impl Parameter {
    pub fn new(var: Atom, kind: Atom, predicate: impl Fn(&Binding) -> bool + 'static) -> Self {
        Self {
            var,
            kind,
            predicate: Box::new(predicate),
        }
    }

    /// Parameter admitting every value of its domain.
    pub fn unconstrained(var: Atom, kind: Atom) -> Self {
        Self::new(var, kind, |_| true)
    }

    #[must_use]
    pub fn var(&self) -> Atom {
        self.var
    }

    #[must_use]
    pub fn kind(&self) -> Atom {
        self.kind
    }

    fn admits(&self, binding: &Binding) -> bool {
        (self.predicate)(binding)
    }
}

impl std::fmt::Debug for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameter")
            .field("var", &self.var)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// A combinator schema: parameters in binding order, then the body type.
#[derive(Debug)]
pub struct Schema {
    params: Vec<Parameter>,
    body: TypeId,
}

impl Schema {
    /// Schema with parameters.
    #[must_use]
    pub fn new(params: Vec<Parameter>, body: TypeId) -> Self {
        Self { params, body }
    }

    /// Parameterless schema.
    #[must_use]
    pub fn mono(body: TypeId) -> Self {
        Self::new(Vec::new(), body)
    }

    #[must_use]
    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    #[must_use]
    pub fn body(&self) -> TypeId {
        self.body
    }
}

/// Repository Γ: combinator name → schema, in insertion order.
///
/// Insertion order is observable: it fixes the order of grammar
/// productions and therefore the enumeration order of terms.
#[derive(Debug, Default)]
pub struct Repository {
    entries: IndexMap<Atom, Schema>,
}

impl Repository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a combinator. A repeated name replaces the earlier schema in
    /// place, keeping its position.
    pub fn insert(&mut self, name: Atom, schema: Schema) {
        self.entries.insert(name, schema);
    }

    #[must_use]
    pub fn get(&self, name: Atom) -> Option<&Schema> {
        self.entries.get(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Atom, &Schema)> + '_ {
        self.entries.iter().map(|(&name, schema)| (name, schema))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Finite literal domains: kind name → admissible values in declared order.
///
/// A kind that was never declared behaves as an empty domain, which makes
/// any schema requiring it uninhabited; that is not an error.
#[derive(Debug, Default)]
pub struct LiteralDomains {
    domains: FxHashMap<Atom, Vec<Lit>>,
}

impl LiteralDomains {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, kind: Atom, values: Vec<Lit>) {
        self.domains.insert(kind, values);
    }

    #[must_use]
    pub fn values(&self, kind: Atom) -> &[Lit] {
        self.domains.get(&kind).map_or(&[], Vec::as_slice)
    }
}

/// One bound schema variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundVar {
    pub var: Atom,
    pub value: Lit,
    pub kind: Atom,
}

/// Literal values selected for a combinator's parameters, in binding order.
///
/// Bindings are tiny (parameter counts are small), so lookup is a linear
/// scan and cloning is cheap.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Binding {
    entries: SmallVec<[BoundVar; 2]>,
}

impl Binding {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, var: Atom) -> Option<Lit> {
        self.entries
            .iter()
            .find(|bound| bound.var == var)
            .map(|bound| bound.value)
    }

    #[must_use]
    pub fn kind_of(&self, var: Atom) -> Option<Atom> {
        self.entries
            .iter()
            .find(|bound| bound.var == var)
            .map(|bound| bound.kind)
    }

    /// Integer value of a bound variable; `None` when unbound or not an
    /// integer. Convenience for arithmetic predicates.
    #[must_use]
    pub fn int(&self, var: Atom) -> Option<i64> {
        match self.get(var) {
            Some(Lit::Int(value)) => Some(value),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundVar> + '_ {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn extended(&self, bound: BoundVar) -> Self {
        let mut entries = self.entries.clone();
        entries.push(bound);
        Self { entries }
    }
}

/// All admissible bindings of a schema's parameters, in lexicographic
/// domain order. The binding tree has depth = number of parameters; each
/// level filters through its parameter's predicate.
pub(crate) fn admissible_bindings(schema: &Schema, domains: &LiteralDomains) -> Vec<Binding> {
    let mut bindings = vec![Binding::empty()];
    for param in schema.params() {
        let values = domains.values(param.kind());
        let mut next = Vec::with_capacity(bindings.len() * values.len());
        for binding in &bindings {
            for &value in values {
                let extended = binding.extended(BoundVar {
                    var: param.var(),
                    value,
                    kind: param.kind(),
                });
                if param.admits(&extended) {
                    next.push(extended);
                }
            }
        }
        bindings = next;
        if bindings.is_empty() {
            break;
        }
    }
    bindings
}

/// Substitute every `Var` in `ty` by the literal its binding selects.
///
/// Capture-free because variable scope is the schema itself. A variable
/// with no binding aborts with [`SolverError::UnboundVariable`].
pub fn instantiate(
    interner: &TypeInterner,
    ty: TypeId,
    binding: &Binding,
) -> Result<TypeId, SolverError> {
    if !interner.has_vars(ty) {
        return Ok(ty);
    }
    match interner.key(ty) {
        TypeKey::Var { name } => match (binding.get(name), binding.kind_of(name)) {
            (Some(value), Some(kind)) => Ok(interner.literal(value, kind)),
            _ => Err(SolverError::UnboundVariable {
                var: interner.resolve_atom(name),
            }),
        },
        TypeKey::Ctor { name, arg } => {
            let arg = instantiate(interner, arg, binding)?;
            Ok(interner.ctor(name, arg))
        }
        TypeKey::Arrow { source, target } => {
            let source = instantiate(interner, source, binding)?;
            let target = instantiate(interner, target, binding)?;
            Ok(interner.arrow(source, target))
        }
        TypeKey::Product { left, right } => {
            let left = instantiate(interner, left, binding)?;
            let right = instantiate(interner, right, binding)?;
            Ok(interner.product(left, right))
        }
        TypeKey::Intersection { left, right } => {
            let left = instantiate(interner, left, binding)?;
            let right = instantiate(interner, right, binding)?;
            Ok(interner.intersection(left, right))
        }
        // has_vars already excluded the remaining atoms.
        TypeKey::Omega | TypeKey::Literal { .. } => Ok(ty),
    }
}
