//! Structural interning of types.
//!
//! The [`TypeInterner`] hash-conses [`TypeKey`]s into [`TypeId`]s and owns
//! the name interner for constructor names, combinator names, literal kinds,
//! and schema variables. Interning gives the engine:
//! - value equality and hash stability as id equality
//! - structural sharing with no back-references
//! - one-time computation of derived attributes (size, ω-flag, organized
//!   decomposition) at construction
//!
//! The interner is append-only behind `RefCell`s, so it is shared by
//! reference across the judge, the inhabitation machine, and the enumerator.

use std::cell::RefCell;

use cls_common::{Atom, Interner};
use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};

use crate::display::TypeDisplay;
use crate::types::{Lit, TypeData, TypeFlags, TypeId, TypeKey, TypeList};

pub struct TypeInterner {
    names: Interner,
    map: RefCell<FxHashMap<TypeKey, TypeId>>,
    types: RefCell<Vec<TypeData>>,
}

impl TypeInterner {
    /// Create an interner with ω pre-registered as [`TypeId::OMEGA`].
    #[must_use]
    pub fn new() -> Self {
        let interner = Self {
            names: Interner::new(),
            map: RefCell::new(FxHashMap::default()),
            types: RefCell::new(Vec::new()),
        };
        let omega = interner.intern(TypeKey::Omega);
        debug_assert_eq!(omega, TypeId::OMEGA);
        interner
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Intern a name (constructor, combinator, kind, or variable).
    pub fn intern_name(&self, name: &str) -> Atom {
        self.names.intern(name)
    }

    /// Resolve an interned name back to its string.
    #[must_use]
    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.names.resolve(atom)
    }

    // =========================================================================
    // Type constructors
    // =========================================================================

    /// The universal supertype ω.
    #[must_use]
    pub fn omega(&self) -> TypeId {
        TypeId::OMEGA
    }

    /// Constructor type `name(arg)`.
    pub fn ctor(&self, name: Atom, arg: TypeId) -> TypeId {
        self.intern(TypeKey::Ctor { name, arg })
    }

    /// Bare constructor type `name`, sugar for `name(ω)`.
    pub fn ctor0(&self, name: Atom) -> TypeId {
        self.ctor(name, TypeId::OMEGA)
    }

    /// Function type `source -> target`.
    pub fn arrow(&self, source: TypeId, target: TypeId) -> TypeId {
        self.intern(TypeKey::Arrow { source, target })
    }

    /// Pair type `left * right`.
    pub fn product(&self, left: TypeId, right: TypeId) -> TypeId {
        self.intern(TypeKey::Product { left, right })
    }

    /// Conjunction `left & right`.
    pub fn intersection(&self, left: TypeId, right: TypeId) -> TypeId {
        self.intern(TypeKey::Intersection { left, right })
    }

    /// Right-fold a sequence into nested intersections; the empty sequence
    /// yields ω.
    pub fn intersect_all(&self, types: &[TypeId]) -> TypeId {
        match types.split_last() {
            None => TypeId::OMEGA,
            Some((&last, init)) => init
                .iter()
                .rev()
                .fold(last, |acc, &ty| self.intersection(ty, acc)),
        }
    }

    /// Singleton literal type for one admissible value of `kind`.
    pub fn literal(&self, value: Lit, kind: Atom) -> TypeId {
        self.intern(TypeKey::Literal { value, kind })
    }

    /// Schema variable.
    pub fn var(&self, name: Atom) -> TypeId {
        self.intern(TypeKey::Var { name })
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Structural key of an interned type.
    #[must_use]
    pub fn key(&self, id: TypeId) -> TypeKey {
        self.types.borrow()[id.index()].key
    }

    /// Node count of the structural tree.
    #[must_use]
    pub fn size(&self, id: TypeId) -> u32 {
        self.types.borrow()[id.index()].size
    }

    /// Whether the type is semantically ω.
    #[must_use]
    pub fn is_omega(&self, id: TypeId) -> bool {
        self.types.borrow()[id.index()]
            .flags
            .contains(TypeFlags::IS_OMEGA)
    }

    /// Whether a schema variable occurs anywhere in the type.
    #[must_use]
    pub fn has_vars(&self, id: TypeId) -> bool {
        self.types.borrow()[id.index()]
            .flags
            .contains(TypeFlags::HAS_VARS)
    }

    /// Organized decomposition: the ω-uniform paths of the type, sorted by
    /// id. ω organizes to the empty set, atoms to themselves.
    #[must_use]
    pub fn organized(&self, id: TypeId) -> TypeList {
        self.types.borrow()[id.index()].organized.clone()
    }

    /// Number of interned types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.borrow().is_empty()
    }

    /// Display adapter using the canonical precedence-respecting printer.
    #[must_use]
    pub fn display(&self, id: TypeId) -> TypeDisplay<'_> {
        TypeDisplay::new(self, id)
    }

    // =========================================================================
    // Interning internals
    // =========================================================================

    fn intern(&self, key: TypeKey) -> TypeId {
        if let Some(&id) = self.map.borrow().get(&key) {
            return id;
        }
        let size = self.size_of(&key);
        let flags = self.flags_of(&key);
        let id = {
            let mut types = self.types.borrow_mut();
            let id = TypeId::from_index(types.len());
            types.push(TypeData {
                key,
                size,
                flags,
                organized: SmallVec::new(),
            });
            id
        };
        self.map.borrow_mut().insert(key, id);
        // Organizing may intern new (structurally smaller) component types,
        // so it runs after the entry exists and outside any borrow.
        let organized = self.organize(id, &key);
        self.types.borrow_mut()[id.index()].organized = organized;
        id
    }

    fn size_of(&self, key: &TypeKey) -> u32 {
        match *key {
            TypeKey::Omega | TypeKey::Literal { .. } | TypeKey::Var { .. } => 1,
            TypeKey::Ctor { arg, .. } => 1 + self.size(arg),
            TypeKey::Arrow { source, target } => 1 + self.size(source) + self.size(target),
            TypeKey::Product { left, right } | TypeKey::Intersection { left, right } => {
                1 + self.size(left) + self.size(right)
            }
        }
    }

    fn flags_of(&self, key: &TypeKey) -> TypeFlags {
        let mut flags = TypeFlags::empty();
        match *key {
            TypeKey::Omega => flags |= TypeFlags::IS_OMEGA,
            TypeKey::Var { .. } => flags |= TypeFlags::HAS_VARS,
            TypeKey::Literal { .. } => {}
            TypeKey::Ctor { arg, .. } => {
                if self.has_vars(arg) {
                    flags |= TypeFlags::HAS_VARS;
                }
            }
            TypeKey::Arrow { source, target } => {
                if self.is_omega(target) {
                    flags |= TypeFlags::IS_OMEGA;
                }
                if self.has_vars(source) || self.has_vars(target) {
                    flags |= TypeFlags::HAS_VARS;
                }
            }
            TypeKey::Product { left, right } => {
                if self.has_vars(left) || self.has_vars(right) {
                    flags |= TypeFlags::HAS_VARS;
                }
            }
            TypeKey::Intersection { left, right } => {
                if self.is_omega(left) && self.is_omega(right) {
                    flags |= TypeFlags::IS_OMEGA;
                }
                if self.has_vars(left) || self.has_vars(right) {
                    flags |= TypeFlags::HAS_VARS;
                }
            }
        }
        flags
    }

    fn organize(&self, self_id: TypeId, key: &TypeKey) -> TypeList {
        let mut paths: TypeList = match *key {
            TypeKey::Omega => SmallVec::new(),
            TypeKey::Literal { .. } | TypeKey::Var { .. } => smallvec![self_id],
            TypeKey::Ctor { name, arg } => {
                let arg_paths = self.organized(arg);
                if arg_paths.len() <= 1 {
                    smallvec![self_id]
                } else {
                    arg_paths
                        .iter()
                        .map(|&path| self.intern(TypeKey::Ctor { name, arg: path }))
                        .collect()
                }
            }
            TypeKey::Product { left, right } => {
                let left_paths = self.organized(left);
                let right_paths = self.organized(right);
                if left_paths.len() + right_paths.len() <= 1 {
                    smallvec![self_id]
                } else {
                    left_paths
                        .iter()
                        .map(|&path| {
                            self.intern(TypeKey::Product {
                                left: path,
                                right: TypeId::OMEGA,
                            })
                        })
                        .chain(right_paths.iter().map(|&path| {
                            self.intern(TypeKey::Product {
                                left: TypeId::OMEGA,
                                right: path,
                            })
                        }))
                        .collect()
                }
            }
            TypeKey::Arrow { source, target } => {
                let target_paths = self.organized(target);
                match target_paths.len() {
                    0 => SmallVec::new(),
                    1 => smallvec![self_id],
                    _ => target_paths
                        .iter()
                        .map(|&path| {
                            self.intern(TypeKey::Arrow {
                                source,
                                target: path,
                            })
                        })
                        .collect(),
                }
            }
            TypeKey::Intersection { left, right } => {
                let mut merged = self.organized(left);
                merged.extend_from_slice(&self.organized(right));
                merged
            }
        };
        paths.sort_unstable();
        paths.dedup();
        paths
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TypeInterner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInterner")
            .field("types", &self.len())
            .field("names", &self.names.len())
            .finish()
    }
}
