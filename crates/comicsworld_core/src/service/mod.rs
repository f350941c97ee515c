//! Core use-case services.
//!
//! # Responsibility
//! - Combine repository outputs into the observable view state.
//! - Keep UI/FFI layers decoupled from storage and catalog details.

pub mod comics_service;
