//! Use-case managers.
//!
//! # Responsibility
//! - Own one persisted record each and keep its in-memory mirror current.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod scratchpad_service;
pub mod settings_service;
pub mod theme_service;
