//! Runtime configuration for the scratchpad managers.
//!
//! # Invariants
//! - `ttl_hours > 0`.
//! - Debounce and countdown intervals are non-zero.
//! - Storage keys are non-empty and pairwise distinct.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_TTL_HOURS: u32 = 6;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(400);
pub const DEFAULT_COUNTDOWN_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_NOTE_KEY: &str = "scratchpad_data";
pub const DEFAULT_SETTINGS_KEY: &str = "notetmp_settings";
pub const DEFAULT_THEME_KEY: &str = "notetmp_theme";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    ZeroTtl,
    ZeroDebounce,
    ZeroCountdownInterval,
    EmptyKey(&'static str),
    DuplicateKey(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroTtl => write!(f, "ttl_hours must be greater than zero"),
            Self::ZeroDebounce => write!(f, "debounce interval must be greater than zero"),
            Self::ZeroCountdownInterval => {
                write!(f, "countdown interval must be greater than zero")
            }
            Self::EmptyKey(field) => write!(f, "storage key `{field}` cannot be empty"),
            Self::DuplicateKey(key) => write!(f, "storage key `{key}` is used twice"),
        }
    }
}

impl Error for ConfigError {}

/// Scratchpad tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchpadConfig {
    /// Lifetime of a saved note.
    pub ttl_hours: u32,
    /// Idle time before typed content is committed.
    pub debounce: Duration,
    /// Refresh period of the remaining-time label.
    pub countdown_interval: Duration,
    /// Clear content mid-session once it expires (load-time purge always applies).
    pub live_expiry: bool,
    pub note_key: String,
    pub settings_key: String,
    pub theme_key: String,
}

impl Default for ScratchpadConfig {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_TTL_HOURS,
            debounce: DEFAULT_DEBOUNCE,
            countdown_interval: DEFAULT_COUNTDOWN_INTERVAL,
            live_expiry: false,
            note_key: DEFAULT_NOTE_KEY.to_string(),
            settings_key: DEFAULT_SETTINGS_KEY.to_string(),
            theme_key: DEFAULT_THEME_KEY.to_string(),
        }
    }
}

impl ScratchpadConfig {
    pub fn with_ttl_hours(mut self, ttl_hours: u32) -> Self {
        self.ttl_hours = ttl_hours;
        self
    }

    pub fn with_live_expiry(mut self, live_expiry: bool) -> Self {
        self.live_expiry = live_expiry;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ttl_hours == 0 {
            return Err(ConfigError::ZeroTtl);
        }
        if self.debounce.is_zero() {
            return Err(ConfigError::ZeroDebounce);
        }
        if self.countdown_interval.is_zero() {
            return Err(ConfigError::ZeroCountdownInterval);
        }

        let keys = [
            ("note_key", self.note_key.as_str()),
            ("settings_key", self.settings_key.as_str()),
            ("theme_key", self.theme_key.as_str()),
        ];
        for (field, key) in keys {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyKey(field));
            }
        }
        for (index, (_, key)) in keys.iter().enumerate() {
            if keys[index + 1..].iter().any(|(_, other)| other == key) {
                return Err(ConfigError::DuplicateKey((*key).to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ScratchpadConfig};
    use std::time::Duration;

    #[test]
    fn defaults_are_valid() {
        let config = ScratchpadConfig::default();
        assert_eq!(config.ttl_hours, 6);
        assert_eq!(config.debounce, Duration::from_millis(400));
        assert!(!config.live_expiry);
        config.validate().unwrap();
    }

    #[test]
    fn rejects_zero_ttl_and_shared_keys() {
        let err = ScratchpadConfig::default().with_ttl_hours(0).validate();
        assert_eq!(err, Err(ConfigError::ZeroTtl));

        let mut config = ScratchpadConfig::default();
        config.theme_key = config.note_key.clone();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateKey(_))
        ));
    }
}
