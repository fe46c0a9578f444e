//! Tree grammar of inhabitants.
//!
//! Nonterminals are type ids, productions are combinator applications. The
//! grammar invariants:
//! - every argument of every production is itself a key of the grammar;
//! - the query type is a key (the root);
//! - the language from a key is non-empty iff that key is inhabited;
//! - `truncated` records resource-bounded construction; the grammar is
//!   then still well-defined but possibly incomplete.

use cls_common::Atom;
use indexmap::IndexMap;
use serde::Serialize;

use crate::display::format_lit;
use crate::intern::TypeInterner;
use crate::repository::Binding;
use crate::types::{TypeId, TypeList};

/// One grammar production: apply `combinator` (instantiated at `binding`)
/// to inhabitants of the argument types, in order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Production {
    combinator: Atom,
    args: TypeList,
    binding: Binding,
}

impl Production {
    #[must_use]
    pub fn new(combinator: Atom, args: TypeList, binding: Binding) -> Self {
        Self {
            combinator,
            args,
            binding,
        }
    }

    #[must_use]
    pub fn combinator(&self) -> Atom {
        self.combinator
    }

    #[must_use]
    pub fn args(&self) -> &[TypeId] {
        &self.args
    }

    #[must_use]
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Textual form for dumps: `name`, `name{x=1}`, `name(a, b)`,
    /// `name{x=1}(a, b)`.
    #[must_use]
    pub fn label(&self, interner: &TypeInterner) -> String {
        let mut out = interner.resolve_atom(self.combinator);
        if !self.binding.is_empty() {
            out.push('{');
            for (i, bound) in self.binding.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&interner.resolve_atom(bound.var));
                out.push('=');
                out.push_str(&format_lit(interner, bound.value));
            }
            out.push('}');
        }
        if !self.args.is_empty() {
            out.push('(');
            for (i, &arg) in self.args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(&interner.display(arg).to_string());
            }
            out.push(')');
        }
        out
    }
}

/// Tree grammar produced by inhabitation.
#[derive(Debug)]
pub struct TreeGrammar {
    start: TypeId,
    rules: IndexMap<TypeId, Vec<Production>>,
    truncated: bool,
}

impl TreeGrammar {
    /// Empty grammar rooted at `start`; the root key exists from the outset.
    #[must_use]
    pub fn new(start: TypeId) -> Self {
        let mut rules = IndexMap::new();
        rules.insert(start, Vec::new());
        Self {
            start,
            rules,
            truncated: false,
        }
    }

    #[must_use]
    pub fn start(&self) -> TypeId {
        self.start
    }

    /// Whether construction stopped early (production cap or cancellation).
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub(crate) fn set_truncated(&mut self) {
        self.truncated = true;
    }

    /// Productions for a key; empty for unknown keys and uninhabited ones.
    #[must_use]
    pub fn productions(&self, ty: TypeId) -> &[Production] {
        self.rules.get(&ty).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn contains_key(&self, ty: TypeId) -> bool {
        self.rules.contains_key(&ty)
    }

    /// Keys in creation order.
    pub fn keys(&self) -> impl Iterator<Item = TypeId> + '_ {
        self.rules.keys().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Total production count across all keys.
    #[must_use]
    pub fn production_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub(crate) fn ensure_key(&mut self, ty: TypeId) {
        self.rules.entry(ty).or_default();
    }

    pub(crate) fn add_production(&mut self, ty: TypeId, production: Production) {
        self.rules.entry(ty).or_default().push(production);
    }

    pub(crate) fn retain_productions(&mut self, mut keep: impl FnMut(&Production) -> bool) {
        for productions in self.rules.values_mut() {
            productions.retain(&mut keep);
        }
    }

    /// Serializable dump keyed by the canonical printer, for tests and
    /// debugging.
    #[must_use]
    pub fn to_dump(&self, interner: &TypeInterner) -> GrammarDump {
        GrammarDump {
            start: interner.display(self.start).to_string(),
            truncated: self.truncated,
            rules: self
                .rules
                .iter()
                .map(|(&ty, productions)| {
                    (
                        interner.display(ty).to_string(),
                        productions
                            .iter()
                            .map(|production| production.label(interner))
                            .collect(),
                    )
                })
                .collect(),
        }
    }
}

/// Serialized grammar form: `{ type-key → [production…] }` plus the root
/// and the truncation flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GrammarDump {
    pub start: String,
    pub truncated: bool,
    pub rules: IndexMap<String, Vec<String>>,
}
