//! Note record and scratchpad lifecycle state.
//!
//! # Invariants
//! - `saved_at` is stamped only when a write succeeds.
//! - `ttl_hours > 0`; a stored record violating this is malformed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Persisted scratchpad payload.
///
/// Serialized with camelCase names. Older web builds wrote `timestamp` and
/// `expiresIn`; both are accepted on read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Plain-text body.
    pub content: String,
    /// Epoch milliseconds of the write that produced this record.
    #[serde(alias = "timestamp")]
    pub saved_at: i64,
    /// Lifetime in hours, captured at save time.
    #[serde(alias = "expiresIn")]
    pub ttl_hours: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    ZeroTtl,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTtl => write!(f, "ttlHours must be greater than zero"),
        }
    }
}

impl Error for NoteValidationError {}

impl NoteRecord {
    pub fn new(content: impl Into<String>, saved_at: i64, ttl_hours: u32) -> Self {
        Self {
            content: content.into(),
            saved_at,
            ttl_hours,
        }
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.ttl_hours == 0 {
            return Err(NoteValidationError::ZeroTtl);
        }
        Ok(())
    }
}

/// Lifecycle of the in-memory scratchpad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteState {
    /// Nothing typed, nothing persisted.
    Empty,
    /// Content changed; commit pending.
    Dirty,
    /// Latest content committed.
    Saved,
    /// Stored content outlived its TTL and was discarded.
    Expired,
    /// Explicitly reset by the user. Behaves like `Empty`.
    Cleared,
}

impl NoteState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Dirty => "dirty",
            Self::Saved => "saved",
            Self::Expired => "expired",
            Self::Cleared => "cleared",
        }
    }
}

/// Word and character counts shown next to the editor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    /// Whitespace-separated tokens.
    pub words: usize,
    /// Unicode scalar values.
    pub chars: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            chars: text.chars().count(),
        }
    }
}
