//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level scratchpad functions to Dart via FRB.
//! - Hold the single process-wide scratchpad session.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call other than `scratchpad_open` works on the open session or
//!   reports `ok=false` with a message.
//! - The Dart side calls `scratchpad_tick` from a periodic timer; no Rust
//!   thread ever writes on its own.

use log::warn;
use notetmp_core::{
    core_version as core_version_inner, export_to_dir, init_logging as init_logging_inner,
    ping as ping_inner, Clock, ScratchpadConfig, ScratchpadSession, SettingsPatch,
    SettingsRecord, SqliteKvStore, SystemClock,
};
use std::sync::{Mutex, OnceLock};

type FfiSession = ScratchpadSession<SqliteKvStore, SystemClock>;

static SESSION: OnceLock<Mutex<Option<FfiSession>>> = OnceLock::new();

const NOT_OPENED: &str = "scratchpad is not open; call scratchpad_open first";

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Editor-facing status, returned after every mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchpadStatus {
    /// Whether the call reached an open session.
    pub ok: bool,
    /// `empty|dirty|saved|expired|cleared`.
    pub state: String,
    /// Remaining-time label; empty when nothing is saved.
    pub time_remaining: String,
    pub has_content: bool,
    pub words: u32,
    pub chars: u32,
    /// Non-fatal storage problem to surface, or diagnostics when `ok=false`.
    pub message: Option<String>,
}

impl ScratchpadStatus {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            state: String::new(),
            time_remaining: String::new(),
            has_content: false,
            words: 0,
            chars: 0,
            message: Some(message.into()),
        }
    }
}

/// Full view of the scratchpad, including the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchpadSnapshot {
    pub content: String,
    pub status: ScratchpadStatus,
}

/// Display settings envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingsResponse {
    pub ok: bool,
    pub font_size: u32,
    pub tab_size: u32,
    pub line_height: f64,
    pub is_dark: bool,
    pub message: Option<String>,
}

impl SettingsResponse {
    fn failure(message: impl Into<String>) -> Self {
        let defaults = SettingsRecord::default();
        Self {
            ok: false,
            font_size: defaults.font_size,
            tab_size: defaults.tab_size,
            line_height: defaults.line_height,
            is_dark: false,
            message: Some(message.into()),
        }
    }
}

/// Export result envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub ok: bool,
    /// Written file path on success.
    pub path: Option<String>,
    pub message: String,
}

/// Opens (or reopens) the scratchpad backed by the SQLite file at `db_path`.
///
/// Expired notes are purged during open. `ttl_hours=None` keeps the default
/// of 6 hours.
///
/// # FFI contract
/// - Sync call; performs DB bootstrap.
/// - Reopening closes (and flushes) the previous session before loading;
///   if the new open fails, no session remains open.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn scratchpad_open(
    db_path: String,
    ttl_hours: Option<u32>,
    live_expiry: bool,
    prefers_dark: bool,
) -> ScratchpadSnapshot {
    let mut config = ScratchpadConfig::default().with_live_expiry(live_expiry);
    if let Some(ttl_hours) = ttl_hours {
        config = config.with_ttl_hours(ttl_hours);
    }

    let failed = |message: String| ScratchpadSnapshot {
        content: String::new(),
        status: ScratchpadStatus::failure(message),
    };

    let mut guard = match session_slot().lock() {
        Ok(guard) => guard,
        Err(_) => return failed("scratchpad session lock poisoned".to_string()),
    };
    // The previous session's pending text must reach the file before the
    // new session reads it back.
    if let Some(mut previous) = guard.take() {
        previous.close();
    }

    let opened = SqliteKvStore::open(db_path.trim())
        .map_err(|err| format!("scratchpad_open failed: {err}"))
        .and_then(|store| {
            ScratchpadSession::open(store, SystemClock, config, prefers_dark)
                .map_err(|err| format!("scratchpad_open failed: {err}"))
        });

    match opened {
        Ok(session) => snapshot_of(guard.insert(session)),
        Err(message) => {
            warn!("event=ffi_open module=ffi status=error error={message}");
            failed(message)
        }
    }
}

/// Returns the current text and status.
#[flutter_rust_bridge::frb(sync)]
pub fn scratchpad_snapshot() -> ScratchpadSnapshot {
    with_session(|session| snapshot_of(session)).unwrap_or_else(|message| ScratchpadSnapshot {
        content: String::new(),
        status: ScratchpadStatus::failure(message),
    })
}

/// Replaces the text; the write is debounced and lands on a later tick.
#[flutter_rust_bridge::frb(sync)]
pub fn scratchpad_update(text: String) -> ScratchpadStatus {
    status_call(|session| session.notes.update_content(text))
}

/// Runs due timers (debounced commit, countdown refresh).
#[flutter_rust_bridge::frb(sync)]
pub fn scratchpad_tick() -> ScratchpadStatus {
    status_call(|session| {
        session.notes.tick();
    })
}

/// Clears the scratchpad and deletes the saved note.
#[flutter_rust_bridge::frb(sync)]
pub fn scratchpad_clear() -> ScratchpadStatus {
    status_call(|session| session.notes.clear_notes())
}

/// Commits pending edits now, e.g. when the app is backgrounded.
#[flutter_rust_bridge::frb(sync)]
pub fn scratchpad_flush() -> ScratchpadStatus {
    status_call(|session| {
        session.notes.flush();
    })
}

/// Writes the current text to a dated `.txt` file inside `dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn scratchpad_export(dir: String) -> ExportResponse {
    let exported = with_session(|session| {
        export_to_dir(dir.trim(), session.notes.content(), SystemClock.now_ms())
            .map_err(|err| format!("scratchpad_export failed: {err}"))
    })
    .and_then(|result| result);

    match exported {
        Ok(path) => ExportResponse {
            ok: true,
            path: Some(path.display().to_string()),
            message: "Notes exported.".to_string(),
        },
        Err(message) => ExportResponse {
            ok: false,
            path: None,
            message,
        },
    }
}

/// Flushes pending edits and releases the session.
///
/// Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn scratchpad_close() -> String {
    let mut guard = match session_slot().lock() {
        Ok(guard) => guard,
        Err(_) => return "scratchpad session lock poisoned".to_string(),
    };
    match guard.take() {
        Some(mut session) => {
            session.close();
            String::new()
        }
        None => NOT_OPENED.to_string(),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_get() -> SettingsResponse {
    settings_call(|_| {})
}

/// Merges the provided fields and persists immediately.
///
/// Values are stored as given; sliders are expected to stay within
/// fontSize 12-24, tabSize 2-8, lineHeight 1.2-2.4.
#[flutter_rust_bridge::frb(sync)]
pub fn settings_update(
    font_size: Option<u32>,
    tab_size: Option<u32>,
    line_height: Option<f64>,
) -> SettingsResponse {
    let patch = SettingsPatch {
        font_size,
        tab_size,
        line_height,
    };
    settings_call(|session| {
        session.settings.update_settings(&patch);
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn settings_reset() -> SettingsResponse {
    settings_call(|session| {
        session.settings.reset_settings();
    })
}

/// Flips light/dark and persists the choice.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_toggle() -> SettingsResponse {
    settings_call(|session| {
        session.theme.toggle();
    })
}

fn session_slot() -> &'static Mutex<Option<FfiSession>> {
    SESSION.get_or_init(|| Mutex::new(None))
}

fn with_session<T>(f: impl FnOnce(&mut FfiSession) -> T) -> Result<T, String> {
    let mut guard = session_slot()
        .lock()
        .map_err(|_| "scratchpad session lock poisoned".to_string())?;
    let session = guard.as_mut().ok_or_else(|| NOT_OPENED.to_string())?;
    Ok(f(session))
}

fn status_call(f: impl FnOnce(&mut FfiSession)) -> ScratchpadStatus {
    with_session(|session| {
        f(session);
        status_of(session)
    })
    .unwrap_or_else(ScratchpadStatus::failure)
}

fn settings_call(f: impl FnOnce(&mut FfiSession)) -> SettingsResponse {
    with_session(|session| {
        f(session);
        let settings = session.settings.settings();
        SettingsResponse {
            ok: true,
            font_size: settings.font_size,
            tab_size: settings.tab_size,
            line_height: settings.line_height,
            is_dark: session.theme.is_dark(),
            message: session.settings.storage_notice().map(str::to_string),
        }
    })
    .unwrap_or_else(SettingsResponse::failure)
}

fn status_of(session: &FfiSession) -> ScratchpadStatus {
    let stats = session.notes.stats();
    ScratchpadStatus {
        ok: true,
        state: session.notes.state().as_str().to_string(),
        time_remaining: session.notes.time_remaining().to_string(),
        has_content: session.notes.has_content(),
        words: u32::try_from(stats.words).unwrap_or(u32::MAX),
        chars: u32::try_from(stats.chars).unwrap_or(u32::MAX),
        message: session.storage_notice().map(str::to_string),
    }
}

fn snapshot_of(session: &FfiSession) -> ScratchpadSnapshot {
    ScratchpadSnapshot {
        content: session.notes.content().to_string(),
        status: status_of(session),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ping, scratchpad_clear, scratchpad_close, scratchpad_export,
        scratchpad_flush, scratchpad_open, scratchpad_snapshot, scratchpad_tick,
        scratchpad_update, settings_get, settings_reset, settings_update, theme_toggle,
    };

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    // One test owns the process-wide session so parallel tests cannot race on it.
    #[test]
    fn session_lifecycle_round_trips_through_sqlite_file() {
        assert!(!scratchpad_snapshot().status.ok);
        assert!(!settings_get().ok);

        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("notetmp.db").display().to_string();

        let opened = scratchpad_open(db_path.clone(), None, false, false);
        assert!(opened.status.ok, "{:?}", opened.status.message);
        assert_eq!(opened.status.state, "empty");

        let status = scratchpad_update("hello from dart".to_string());
        assert_eq!(status.state, "dirty");
        assert_eq!(status.words, 3);
        assert!(scratchpad_tick().ok);

        let flushed = scratchpad_flush();
        assert_eq!(flushed.state, "saved");
        assert_eq!(flushed.time_remaining, "6h 0m");

        let settings = settings_update(Some(18), None, None);
        assert!(settings.ok);
        assert_eq!((settings.font_size, settings.tab_size), (18, 4));
        assert!(theme_toggle().is_dark);

        let export_dir = dir.path().join("exports");
        let exported = scratchpad_export(export_dir.display().to_string());
        assert!(exported.ok, "{}", exported.message);
        let exported_path = exported.path.expect("export should return a path");
        assert_eq!(
            std::fs::read_to_string(exported_path).unwrap(),
            "hello from dart"
        );

        assert_eq!(scratchpad_close(), "");
        assert!(!scratchpad_snapshot().status.ok);

        let reopened = scratchpad_open(db_path.clone(), None, false, false);
        assert_eq!(reopened.content, "hello from dart");
        assert_eq!(reopened.status.state, "saved");
        assert_eq!(settings_get().font_size, 18);
        assert!(settings_get().is_dark);
        assert_eq!(settings_reset().font_size, 15);

        scratchpad_update("a".to_string());
        scratchpad_flush();
        scratchpad_update("b".to_string());
        let replaced = scratchpad_open(db_path, None, false, false);
        assert_eq!(replaced.content, "b");
        assert_eq!(replaced.status.state, "saved");
        assert_eq!(scratchpad_snapshot().content, "b");

        let cleared = scratchpad_clear();
        assert_eq!(cleared.state, "cleared");
        assert!(!cleared.has_content);
        assert!(!scratchpad_export(dir.path().display().to_string()).ok);
        assert_eq!(scratchpad_close(), "");
    }
}
