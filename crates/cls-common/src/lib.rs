//! Common types and utilities for the cls inhabitation engine.
//!
//! This crate provides foundational types used across all cls crates:
//! - String interning (`Atom`, `Interner`) for constructor names, combinator
//!   names, literal kinds, and schema variables
//! - Centralized limits and thresholds

// String interning for name deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;
