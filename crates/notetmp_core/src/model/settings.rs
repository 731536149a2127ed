//! Editor display settings.
//!
//! # Invariants
//! - Stored records are merged over defaults on load, so partial or older
//!   payloads never lose defaults for missing fields.
//! - Range limits are advisory for hosts; nothing here rejects values.

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

pub const DEFAULT_FONT_SIZE: u32 = 15;
pub const DEFAULT_TAB_SIZE: u32 = 4;
pub const DEFAULT_LINE_HEIGHT: f64 = 1.7;

/// Slider bounds used by settings UIs.
pub const FONT_SIZE_RANGE: RangeInclusive<u32> = 12..=24;
pub const TAB_SIZE_RANGE: RangeInclusive<u32> = 2..=8;
pub const LINE_HEIGHT_RANGE: RangeInclusive<f64> = 1.2..=2.4;

/// Full settings record as persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRecord {
    /// Editor font size in px.
    pub font_size: u32,
    /// Spaces per tab stop.
    pub tab_size: u32,
    pub line_height: f64,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            tab_size: DEFAULT_TAB_SIZE,
            line_height: DEFAULT_LINE_HEIGHT,
        }
    }
}

impl SettingsRecord {
    /// Shallow-merges the fields present in `patch`.
    pub fn merged(mut self, patch: &SettingsPatch) -> Self {
        if let Some(font_size) = patch.font_size {
            self.font_size = font_size;
        }
        if let Some(tab_size) = patch.tab_size {
            self.tab_size = tab_size;
        }
        if let Some(line_height) = patch.line_height {
            self.line_height = line_height;
        }
        self
    }

    /// Copy with every field pulled into its UI range.
    pub fn clamped(self) -> Self {
        Self {
            font_size: self
                .font_size
                .clamp(*FONT_SIZE_RANGE.start(), *FONT_SIZE_RANGE.end()),
            tab_size: self
                .tab_size
                .clamp(*TAB_SIZE_RANGE.start(), *TAB_SIZE_RANGE.end()),
            line_height: if self.line_height.is_finite() {
                self.line_height
                    .clamp(*LINE_HEIGHT_RANGE.start(), *LINE_HEIGHT_RANGE.end())
            } else {
                DEFAULT_LINE_HEIGHT
            },
        }
    }
}

/// Partial settings update. Also the decode shape of stored records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
}

impl SettingsPatch {
    pub fn font_size(value: u32) -> Self {
        Self {
            font_size: Some(value),
            ..Self::default()
        }
    }

    pub fn tab_size(value: u32) -> Self {
        Self {
            tab_size: Some(value),
            ..Self::default()
        }
    }

    pub fn line_height(value: f64) -> Self {
        Self {
            line_height: Some(value),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.font_size.is_none() && self.tab_size.is_none() && self.line_height.is_none()
    }
}
