//! Finite combinatory logic inhabitation over intersection types.
//!
//! Given a repository of typed combinators, a subtype environment on
//! constructor names, and finite literal domains, the solver answers type
//! inhabitation queries: it builds a tree grammar whose language is exactly
//! the set of applicative terms typeable at a subtype of the query, then
//! enumerates that language lazily and fairly.
//!
//! This crate is organized into:
//! - `types` / `intern` - interned type algebra with precomputed derived
//!   attributes (size, ω-flag, organized decomposition)
//! - `display` - canonical precedence-respecting type printer
//! - `subtype` - environment closure and the subtype decision procedure
//! - `repository` - combinator schemas, literal domains, parameter bindings
//! - `inhabit` - worklist saturation producing the tree grammar
//! - `grammar` - the grammar representation and its serializable dump
//! - `enumerate` - lazy fair term enumeration
//! - `interpret` - host-side semantics application
//! - `error` - the solver error surface

pub mod display;
pub mod enumerate;
pub mod error;
pub mod grammar;
pub mod inhabit;
pub mod intern;
pub mod interpret;
pub mod repository;
pub mod subtype;
pub mod types;

pub use display::TypeDisplay;
pub use enumerate::{Term, TermStream, enumerate_terms};
pub use error::SolverError;
pub use grammar::{GrammarDump, Production, TreeGrammar};
pub use inhabit::{InhabitOptions, InhabitationMachine, inhabit};
pub use intern::TypeInterner;
pub use interpret::{SemanticFn, Semantics, interpret_term};
pub use repository::{
    Binding, BoundVar, LiteralDomains, Parameter, Predicate, Repository, Schema, instantiate,
};
pub use subtype::{SubtypeJudge, TypeEnvironment};
pub use types::{Lit, TypeId, TypeKey};

#[cfg(test)]
mod tests;
