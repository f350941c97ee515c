//! Domain model for the comic catalog and user selection state.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep filter/sort enumerations closed and shared across layers.
//!
//! # Invariants
//! - Comic records are immutable values with structural equality only.
//! - `UserPreferences::default()` is the universal fallback for absent or
//!   unreadable persisted state.

pub mod comic;
pub mod preferences;
