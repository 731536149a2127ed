//! SQLite-backed key-value store.
//!
//! # Responsibility
//! - Persist raw record strings in the `kv_store` table.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - One row per key; writes upsert and refresh `updated_at`.
//! - Constructors reject connections whose schema lacks `kv_store`.

use super::{KeyValueStore, StoreError, StoreResult};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const KV_TABLE: &str = "kv_store";

/// Durable store over one migrated SQLite connection.
///
/// The connection sits behind a mutex so a store can be shared across the
/// threads a UI host may call from.
pub struct SqliteKvStore {
    conn: Mutex<Connection>,
}

impl SqliteKvStore {
    /// Opens (creating if needed) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Wraps a migrated/ready connection.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        ensure_kv_table_ready(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }

    /// Returns the `updated_at` stamp (epoch ms) of `key`, if present.
    pub fn updated_at(&self, key: &str) -> StoreResult<Option<i64>> {
        let stamp = self
            .conn()?
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(stamp)
    }
}

impl KeyValueStore for SqliteKvStore {
    fn read(&self, key: &str) -> StoreResult<Option<String>> {
        let value = self
            .conn()?
            .query_row("SELECT value FROM kv_store WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, raw: &str) -> StoreResult<()> {
        self.conn()?.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, raw],
        )?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.conn()?
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }
}

fn ensure_kv_table_ready(conn: &Connection) -> StoreResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [KV_TABLE],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(StoreError::MissingRequiredTable(KV_TABLE));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::SqliteKvStore;
    use crate::store::{KeyValueStore, StoreError};
    use rusqlite::Connection;

    #[test]
    fn upsert_overwrites_existing_value() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        store.write("note", "first").unwrap();
        store.write("note", "second").unwrap();
        assert_eq!(store.read("note").unwrap().as_deref(), Some("second"));
        assert!(store.updated_at("note").unwrap().is_some());
    }

    #[test]
    fn delete_of_missing_key_is_noop() {
        let store = SqliteKvStore::open_in_memory().unwrap();
        store.delete("missing").unwrap();
        assert_eq!(store.read("missing").unwrap(), None);
        assert_eq!(store.updated_at("missing").unwrap(), None);
    }

    #[test]
    fn unmigrated_connection_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        let err = SqliteKvStore::try_new(conn).err().expect("schema check should fail");
        assert!(matches!(err, StoreError::MissingRequiredTable("kv_store")));
    }
}
