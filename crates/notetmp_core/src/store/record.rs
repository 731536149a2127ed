//! Typed JSON records on top of raw key-value storage.
//!
//! Malformed payloads are reported, not raised: a record that fails to parse
//! is `RecordRead::Malformed` and callers treat it as absent.

use super::{KeyValueStore, StoreError, StoreResult};
use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Outcome of decoding one stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordRead<T> {
    Absent,
    Found(T),
    /// Stored text exists but does not decode; carries the parser message.
    Malformed(String),
}

impl<T> RecordRead<T> {
    /// Collapses `Malformed` into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::Absent | Self::Malformed(_) => None,
        }
    }
}

/// Reads and decodes the JSON record stored under `key`.
pub fn read_record<T, S>(store: &S, key: &str) -> StoreResult<RecordRead<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.read(key)? else {
        return Ok(RecordRead::Absent);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(RecordRead::Found(value)),
        Err(err) => Ok(RecordRead::Malformed(err.to_string())),
    }
}

/// Encodes `value` as JSON and overwrites `key`.
pub fn write_record<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|err| StoreError::Encode(err.to_string()))?;
    store.write(key, &raw)
}

/// Deletes `key`, logging instead of failing.
///
/// Used for lazy cleanup where the caller has already decided the entry is
/// dead and there is nothing useful to do on failure.
pub fn delete_quietly<S>(store: &S, key: &str, module: &str)
where
    S: KeyValueStore + ?Sized,
{
    if let Err(err) = store.delete(key) {
        warn!("event=record_delete module={module} status=error key={key} error={err}");
    }
}

#[cfg(test)]
mod tests {
    use super::{read_record, write_record, RecordRead};
    use crate::store::{KeyValueStore, MemoryKvStore};
    use std::collections::BTreeMap;

    #[test]
    fn malformed_payload_is_reported_not_raised() {
        let store = MemoryKvStore::new();
        store.write("k", "{not json").unwrap();
        let read: RecordRead<BTreeMap<String, u32>> = read_record(&store, "k").unwrap();
        assert!(matches!(read, RecordRead::Malformed(_)));
        assert_eq!(read.into_option(), None);
    }

    #[test]
    fn written_record_decodes() {
        let store = MemoryKvStore::new();
        let mut value = BTreeMap::new();
        value.insert("a".to_string(), 1_u32);
        write_record(&store, "k", &value).unwrap();
        let read: RecordRead<BTreeMap<String, u32>> = read_record(&store, "k").unwrap();
        assert_eq!(read, RecordRead::Found(value));
    }
}
