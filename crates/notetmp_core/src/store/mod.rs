//! Client-local key-value persistence.
//!
//! # Responsibility
//! - Define the `KeyValueStore` contract used by every manager.
//! - Provide durable (SQLite) and ephemeral (in-memory) implementations.
//! - Provide typed JSON record helpers that never fail on malformed data.
//!
//! # Invariants
//! - `write` overwrites the whole value stored under a key.
//! - `delete` of an absent key succeeds.
//! - Stores hold raw strings; record shape is owned by the caller.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

mod memory_store;
pub mod record;
mod sqlite_store;

pub use memory_store::MemoryKvStore;
pub use record::{delete_quietly, read_record, write_record, RecordRead};
pub use sqlite_store::SqliteKvStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of a store operation.
///
/// Callers in this crate never propagate these to the UI as fatal; they
/// degrade to empty/default state.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Backend refused the operation (quota, disabled storage, poisoned lock).
    Unavailable(String),
    /// Value could not be serialized before writing.
    Encode(String),
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Encode(reason) => write!(f, "failed to encode record: {reason}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "store schema is missing table `{table}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value store scoped to one client profile.
///
/// Methods take `&self` so one store can be shared by managers that own
/// disjoint keys.
pub trait KeyValueStore {
    /// Returns the raw value under `key`, or `None` when never written.
    fn read(&self, key: &str) -> StoreResult<Option<String>>;
    /// Replaces the raw value under `key`.
    fn write(&self, key: &str, raw: &str) -> StoreResult<()>;
    /// Removes `key`. Absent keys are not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, raw: &str) -> StoreResult<()> {
        (**self).write(key, raw)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, raw: &str) -> StoreResult<()> {
        (**self).write(key, raw)
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        (**self).delete(key)
    }
}
