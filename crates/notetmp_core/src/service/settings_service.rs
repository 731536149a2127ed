//! Settings manager.
//!
//! # Responsibility
//! - Load display settings merged over defaults.
//! - Persist every change immediately (no debounce).
//!
//! # Invariants
//! - Sole writer of the settings key.
//! - Out-of-range values are stored as given; clamping is a host decision.
//! - Storage failures never roll back the in-memory settings.

use crate::model::settings::{SettingsPatch, SettingsRecord};
use crate::store::{delete_quietly, read_record, write_record, KeyValueStore, RecordRead};
use log::{info, warn};

const LOG_MODULE: &str = "settings";

pub struct SettingsManager<S: KeyValueStore> {
    store: S,
    key: String,
    settings: SettingsRecord,
    storage_notice: Option<String>,
}

impl<S: KeyValueStore> SettingsManager<S> {
    /// Loads settings stored under `key`, falling back to defaults.
    pub fn load(store: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let mut storage_notice = None;
        let settings = match read_record::<SettingsPatch, _>(&store, &key) {
            Ok(RecordRead::Found(stored)) => SettingsRecord::default().merged(&stored),
            Ok(RecordRead::Absent) => SettingsRecord::default(),
            Ok(RecordRead::Malformed(reason)) => {
                warn!(
                    "event=settings_load module={LOG_MODULE} status=recovered outcome=malformed error={reason}"
                );
                delete_quietly(&store, &key, LOG_MODULE);
                SettingsRecord::default()
            }
            Err(err) => {
                warn!("event=settings_load module={LOG_MODULE} status=error error={err}");
                storage_notice = Some(format!("Settings could not be read: {err}"));
                SettingsRecord::default()
            }
        };

        Self {
            store,
            key,
            settings,
            storage_notice,
        }
    }

    pub fn settings(&self) -> SettingsRecord {
        self.settings
    }

    /// Shallow-merges `patch` and persists the full record.
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> SettingsRecord {
        self.settings = self.settings.merged(patch);
        self.persist("settings_update");
        self.settings
    }

    /// Restores defaults and persists them.
    pub fn reset_settings(&mut self) -> SettingsRecord {
        self.settings = SettingsRecord::default();
        self.persist("settings_reset");
        self.settings
    }

    pub fn storage_notice(&self) -> Option<&str> {
        self.storage_notice.as_deref()
    }

    fn persist(&mut self, event: &str) {
        match write_record(&self.store, &self.key, &self.settings) {
            Ok(()) => {
                self.storage_notice = None;
                info!(
                    "event={event} module={LOG_MODULE} status=ok font_size={} tab_size={} line_height={}",
                    self.settings.font_size, self.settings.tab_size, self.settings.line_height
                );
            }
            Err(err) => {
                warn!("event={event} module={LOG_MODULE} status=error error={err}");
                self.storage_notice = Some(format!("Settings could not be saved: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SettingsManager;
    use crate::model::settings::{SettingsPatch, SettingsRecord};
    use crate::store::{KeyValueStore, MemoryKvStore};

    #[test]
    fn update_persists_full_record() {
        let store = MemoryKvStore::new();
        let mut manager = SettingsManager::load(&store, "s");
        manager.update_settings(&SettingsPatch::tab_size(8));

        let raw = store.read("s").unwrap().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["tabSize"], 8);
        assert_eq!(json["fontSize"], 15);
        assert_eq!(json["lineHeight"], 1.7);
    }

    #[test]
    fn failed_write_keeps_in_memory_change() {
        let store = MemoryKvStore::new();
        let mut manager = SettingsManager::load(&store, "s");
        store.set_unavailable(true);

        let updated = manager.update_settings(&SettingsPatch::font_size(20));
        assert_eq!(updated.font_size, 20);
        assert!(manager.storage_notice().is_some());

        store.set_unavailable(false);
        assert_eq!(manager.reset_settings(), SettingsRecord::default());
        assert!(manager.storage_notice().is_none());
    }
}
