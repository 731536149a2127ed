//! One scratchpad session: note, settings and theme managers over a single
//! shared store.
//!
//! Hosts (FFI, CLI) hold one `ScratchpadSession` and route every UI action
//! through it. The three managers own disjoint keys of the same store.

use crate::clock::Clock;
use crate::config::{ConfigError, ScratchpadConfig};
use crate::service::scratchpad_service::ScratchpadManager;
use crate::service::settings_service::SettingsManager;
use crate::service::theme_service::ThemeManager;
use crate::store::KeyValueStore;
use std::sync::Arc;

pub struct ScratchpadSession<S: KeyValueStore, C: Clock> {
    pub notes: ScratchpadManager<Arc<S>, C>,
    pub settings: SettingsManager<Arc<S>>,
    pub theme: ThemeManager<Arc<S>>,
}

impl<S: KeyValueStore, C: Clock> ScratchpadSession<S, C> {
    /// Loads all three records from `store`.
    ///
    /// `prefers_dark` is the system theme, used when no theme is stored.
    pub fn open(
        store: S,
        clock: C,
        config: ScratchpadConfig,
        prefers_dark: bool,
    ) -> Result<Self, ConfigError> {
        let store = Arc::new(store);
        let settings = SettingsManager::load(Arc::clone(&store), config.settings_key.clone());
        let theme = ThemeManager::load(Arc::clone(&store), config.theme_key.clone(), prefers_dark);
        let notes = ScratchpadManager::load(store, clock, config)?;
        Ok(Self {
            notes,
            settings,
            theme,
        })
    }

    /// Flushes pending note edits and stops the note timers.
    pub fn close(&mut self) {
        self.notes.flush();
        self.notes.shutdown();
    }

    /// First storage problem reported by any manager.
    pub fn storage_notice(&self) -> Option<&str> {
        self.notes
            .storage_notice()
            .or_else(|| self.settings.storage_notice())
            .or_else(|| self.theme.storage_notice())
    }
}
