//! Scratchpad data model.
//!
//! # Responsibility
//! - Define the persisted record shapes (note, settings, theme).
//! - Define the in-memory lifecycle state of the scratchpad.
//!
//! # Invariants
//! - Every record is a self-contained JSON (or raw string) value under one key.
//! - Records are overwritten wholesale, never appended.

pub mod note;
pub mod settings;
pub mod theme;
