//! Core type representation.
//!
//! Types are interned: a [`TypeId`] is a small copyable handle into the
//! [`TypeInterner`](crate::intern::TypeInterner), and [`TypeKey`] is the
//! closed structural variant behind a handle. Structural equality and
//! hashing collapse to id equality because equal keys always intern to the
//! same id.
//!
//! Every interned type carries derived attributes computed once at intern
//! time and never mutated afterwards:
//! - `size`: node count of the structural tree
//! - `IS_OMEGA`: whether the type is semantically ω (ω itself, arrows into
//!   ω, intersections of ω with ω)
//! - `HAS_VARS`: whether a schema variable occurs anywhere inside
//! - `organized`: the ω-uniform path decomposition used by the subtype
//!   decider and the inhabitation machine

use bitflags::bitflags;
use cls_common::Atom;
use cls_common::limits::TYPE_LIST_INLINE;
use smallvec::SmallVec;

/// Interned type handle.
///
/// Ordering follows creation order in the interner; it has no semantic
/// meaning but keeps derived sets (organized paths) deterministic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    /// The universal supertype ω, pre-registered at interner construction.
    pub const OMEGA: TypeId = TypeId(0);

    #[must_use]
    pub(crate) fn from_index(index: usize) -> TypeId {
        TypeId(u32::try_from(index).expect("type interner overflow"))
    }

    #[must_use]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A literal host value drawn from a declared finite domain.
///
/// The engine never computes with these values; they flow from literal
/// domains through parameter bindings into singleton `Literal` types and
/// back out to host-side predicates and semantic functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lit {
    Int(i64),
    Bool(bool),
    Str(Atom),
}

/// Structural key of an interned type. Closed set of variants; all
/// pattern matching on types goes through this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    /// The universal supertype ω.
    Omega,
    /// Named constructor with a single type argument. A bare constructor
    /// `n` is represented as `n(ω)`; both spellings intern identically.
    Ctor { name: Atom, arg: TypeId },
    /// Function type, contravariant in `source`.
    Arrow { source: TypeId, target: TypeId },
    /// Pair type, covariant in both components. Never ω.
    Product { left: TypeId, right: TypeId },
    /// Conjunction of two types.
    Intersection { left: TypeId, right: TypeId },
    /// Singleton type carrying one admissible host value of `kind`.
    Literal { value: Lit, kind: Atom },
    /// Schema variable, resolved to a `Literal` during inhabitation.
    Var { name: Atom },
}

bitflags! {
    /// Derived per-type attribute flags, fixed at intern time.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct TypeFlags: u8 {
        /// The type is semantically ω.
        const IS_OMEGA = 1 << 0;
        /// A `Var` occurs somewhere in the type.
        const HAS_VARS = 1 << 1;
    }
}

/// List of type ids with inline capacity for the common small case.
pub type TypeList = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

/// Interned record: structural key plus derived attributes.
#[derive(Clone, Debug)]
pub(crate) struct TypeData {
    pub key: TypeKey,
    pub size: u32,
    pub flags: TypeFlags,
    /// Organized decomposition, sorted by id and deduplicated.
    pub organized: TypeList,
}
