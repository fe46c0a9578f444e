//! Canonical type printer.
//!
//! Grammar keys and test output use this printer: `omega`; `n`; `n(τ)`;
//! `τ₁ -> τ₂`; `τ₁ * τ₂`; `τ₁ & τ₂`. Precedence is
//! Intersection > Product > Arrow, arrows associate to the right, and
//! parentheses appear only when precedence demands them.

use std::fmt;

use crate::intern::TypeInterner;
use crate::types::{Lit, TypeId, TypeKey};

const ARROW_PREC: u8 = 8;
const PRODUCT_PREC: u8 = 9;
const INTERSECTION_PREC: u8 = 10;

/// Display adapter borrowing the interner; obtained via
/// [`TypeInterner::display`].
pub struct TypeDisplay<'a> {
    interner: &'a TypeInterner,
    id: TypeId,
}

impl<'a> TypeDisplay<'a> {
    pub(crate) fn new(interner: &'a TypeInterner, id: TypeId) -> Self {
        Self { interner, id }
    }

    fn fmt_prec(&self, f: &mut fmt::Formatter<'_>, id: TypeId, prec: u8) -> fmt::Result {
        match self.interner.key(id) {
            TypeKey::Omega => f.write_str("omega"),
            TypeKey::Var { name } => f.write_str(&self.interner.resolve_atom(name)),
            TypeKey::Literal { value, .. } => f.write_str(&format_lit(self.interner, value)),
            TypeKey::Ctor { name, arg } => {
                f.write_str(&self.interner.resolve_atom(name))?;
                if arg != TypeId::OMEGA {
                    f.write_str("(")?;
                    self.fmt_prec(f, arg, 0)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
            TypeKey::Arrow { source, target } => {
                let parens = prec > ARROW_PREC;
                if parens {
                    f.write_str("(")?;
                }
                self.fmt_prec(f, source, ARROW_PREC + 1)?;
                f.write_str(" -> ")?;
                // Right-associative: a chained arrow target prints unparenthesized.
                let target_prec = match self.interner.key(target) {
                    TypeKey::Arrow { .. } => ARROW_PREC,
                    _ => ARROW_PREC + 1,
                };
                self.fmt_prec(f, target, target_prec)?;
                if parens {
                    f.write_str(")")?;
                }
                Ok(())
            }
            TypeKey::Product { left, right } => {
                let parens = prec > PRODUCT_PREC;
                if parens {
                    f.write_str("(")?;
                }
                let left_prec = match self.interner.key(left) {
                    TypeKey::Product { .. } => PRODUCT_PREC,
                    _ => PRODUCT_PREC + 1,
                };
                self.fmt_prec(f, left, left_prec)?;
                f.write_str(" * ")?;
                self.fmt_prec(f, right, PRODUCT_PREC + 1)?;
                if parens {
                    f.write_str(")")?;
                }
                Ok(())
            }
            TypeKey::Intersection { left, right } => {
                let parens = prec > INTERSECTION_PREC;
                if parens {
                    f.write_str("(")?;
                }
                self.fmt_side(f, left)?;
                f.write_str(" & ")?;
                self.fmt_side(f, right)?;
                if parens {
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }

    fn fmt_side(&self, f: &mut fmt::Formatter<'_>, side: TypeId) -> fmt::Result {
        let side_prec = match self.interner.key(side) {
            TypeKey::Intersection { .. } => INTERSECTION_PREC,
            _ => INTERSECTION_PREC + 1,
        };
        self.fmt_prec(f, side, side_prec)
    }
}

impl fmt::Display for TypeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_prec(f, self.id, 0)
    }
}

/// Literal values print as their bare host value.
pub(crate) fn format_lit(interner: &TypeInterner, lit: Lit) -> String {
    match lit {
        Lit::Int(value) => value.to_string(),
        Lit::Bool(value) => value.to_string(),
        Lit::Str(atom) => interner.resolve_atom(atom),
    }
}
