//! Centralized limits and thresholds for the inhabitation engine.
//!
//! This module provides shared constants for recursion, search, and capacity
//! limits used throughout the codebase. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Makes it easy to tune limits for different environments
//! - Documents the rationale for each limit

// =============================================================================
// Stack Limits (Subtype Decider)
// =============================================================================
// The subtype decision procedure recurses structurally over types. It always
// terminates, but adversarially deep types could exhaust the OS stack, so the
// decider grows its stack on demand instead of capping recursion depth.

/// Remaining-stack threshold below which the subtype decider grows the stack.
///
/// Checked on every recursive step; when less than this many bytes remain,
/// a new stack segment is allocated before descending further.
pub const STACK_RED_ZONE: usize = 100 * 1024;

/// Size of each on-demand stack segment allocated by the subtype decider.
pub const STACK_PER_GROWTH: usize = 1024 * 1024;

// =============================================================================
// Search Limits (Inhabitation)
// =============================================================================

/// Maximum organized arrow paths of one instantiated combinator type that
/// participate in the subset-cover search.
///
/// A combinator whose type is an intersection of arrows contributes one
/// organized path per conjunct; covering an intersection target may require
/// combining several of them, and the cover search examines subsets of the
/// path list. Beyond this many paths the subset space (2^n) stops being
/// tractable; the engine then considers only the first `MAX_COVER_PATHS`
/// paths and flags the resulting grammar as truncated.
pub const MAX_COVER_PATHS: usize = 16;

// =============================================================================
// Capacity Limits
// =============================================================================

/// Inline capacity for type-id lists (production arguments, arrow spines,
/// organized paths).
///
/// Lists backed by `SmallVec<[TypeId; 4]>` hold up to 4 elements without
/// heap allocation. Combinators in real repositories rarely take more than
/// four arguments, so this avoids allocation in the common case.
pub const TYPE_LIST_INLINE: usize = 4;
