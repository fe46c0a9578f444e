//! Error surface of the solver.
//!
//! Only genuinely exceptional conditions are errors. Uninhabited targets are
//! not: they yield grammars without productions and empty term streams.
//! Resource exhaustion (production cap, cooperative cancellation) is not
//! either: it yields a partial grammar flagged as truncated.

use std::error::Error;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SolverError {
    /// A schema body references a variable that no parameter of the schema
    /// binds. Grammar construction aborts.
    UnboundVariable { var: String },
    /// A term mentions a combinator with no registered semantic function.
    UnknownCombinator { name: String },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::UnboundVariable { var } => {
                write!(f, "schema references unbound variable `{var}`")
            }
            SolverError::UnknownCombinator { name } => {
                write!(f, "no semantic function registered for combinator `{name}`")
            }
        }
    }
}

impl Error for SolverError {}
