//! Theme preference manager.
//!
//! A stored `"light"`/`"dark"` value wins over the system preference. When
//! nothing usable is stored, the resolved value is written back so the next
//! load is stable.

use crate::model::theme::Theme;
use crate::store::KeyValueStore;
use log::{info, warn};

const LOG_MODULE: &str = "theme";

pub struct ThemeManager<S: KeyValueStore> {
    store: S,
    key: String,
    theme: Theme,
    storage_notice: Option<String>,
}

impl<S: KeyValueStore> ThemeManager<S> {
    pub fn load(store: S, key: impl Into<String>, prefers_dark: bool) -> Self {
        let key = key.into();
        let mut storage_notice = None;
        let stored = match store.read(&key) {
            Ok(raw) => raw.as_deref().and_then(Theme::parse),
            Err(err) => {
                warn!("event=theme_load module={LOG_MODULE} status=error error={err}");
                storage_notice = Some(format!("Theme could not be read: {err}"));
                None
            }
        };

        let mut manager = Self {
            store,
            key,
            theme: stored.unwrap_or_else(|| Theme::from_prefers_dark(prefers_dark)),
            storage_notice,
        };
        if stored.is_none() {
            manager.persist();
        }
        manager
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }

    pub fn set(&mut self, theme: Theme) -> Theme {
        self.theme = theme;
        self.persist();
        self.theme
    }

    pub fn toggle(&mut self) -> Theme {
        self.set(self.theme.toggled())
    }

    pub fn storage_notice(&self) -> Option<&str> {
        self.storage_notice.as_deref()
    }

    fn persist(&mut self) {
        match self.store.write(&self.key, self.theme.as_str()) {
            Ok(()) => {
                self.storage_notice = None;
                info!(
                    "event=theme_persist module={LOG_MODULE} status=ok theme={}",
                    self.theme.as_str()
                );
            }
            Err(err) => {
                warn!("event=theme_persist module={LOG_MODULE} status=error error={err}");
                self.storage_notice = Some(format!("Theme could not be saved: {err}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ThemeManager;
    use crate::model::theme::Theme;
    use crate::store::{KeyValueStore, MemoryKvStore};

    #[test]
    fn stored_value_beats_system_preference() {
        let store = MemoryKvStore::new();
        store.write("t", "light").unwrap();
        let writes = store.write_count();
        let manager = ThemeManager::load(&store, "t", true);
        assert_eq!(manager.theme(), Theme::Light);
        assert_eq!(store.write_count(), writes, "a recognised value is not rewritten");
    }

    #[test]
    fn falls_back_to_system_preference_and_persists() {
        let store = MemoryKvStore::new();
        store.write("t", "sepia").unwrap();
        let mut manager = ThemeManager::load(&store, "t", true);
        assert!(manager.is_dark());
        assert_eq!(store.read("t").unwrap().as_deref(), Some("dark"));

        assert_eq!(manager.toggle(), Theme::Light);
        assert_eq!(store.read("t").unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn failed_write_records_notice_until_next_success() {
        let store = MemoryKvStore::new();
        let mut manager = ThemeManager::load(&store, "t", false);
        assert!(manager.storage_notice().is_none());

        store.set_unavailable(true);
        assert_eq!(manager.toggle(), Theme::Dark);
        assert!(manager.storage_notice().is_some());

        store.set_unavailable(false);
        manager.set(Theme::Dark);
        assert!(manager.storage_notice().is_none());
        assert_eq!(store.read("t").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn unreadable_store_on_load_records_notice() {
        let store = MemoryKvStore::new();
        store.set_unavailable(true);
        let manager = ThemeManager::load(&store, "t", true);
        assert!(manager.is_dark());
        assert!(manager.storage_notice().is_some());
    }
}
