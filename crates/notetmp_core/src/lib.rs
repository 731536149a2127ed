//! Core domain logic for NoteTmp, an auto-saving, self-expiring scratchpad.
//! This crate is the single source of truth for persistence and expiry rules.

pub mod clock;
pub mod config;
pub mod db;
pub mod expiry;
pub mod export;
pub mod logging;
pub mod model;
pub mod service;
pub mod session;
pub mod store;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ScratchpadConfig};
pub use export::{export_file_name, export_to_dir, ExportError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{NoteRecord, NoteState, TextStats};
pub use model::settings::{SettingsPatch, SettingsRecord};
pub use model::theme::Theme;
pub use service::scratchpad_service::{ScratchpadManager, TickOutcome};
pub use service::settings_service::SettingsManager;
pub use service::theme_service::ThemeManager;
pub use session::ScratchpadSession;
pub use store::{KeyValueStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
