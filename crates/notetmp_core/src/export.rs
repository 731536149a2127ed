//! Plain-text export of the scratchpad.
//!
//! # Invariants
//! - Export files are UTF-8 text named `notetmp-YYYY-MM-DD.txt` after the
//!   local calendar date of the export.
//! - Existing files are never overwritten; a numeric suffix is added instead.
//! - Empty content is not exported.

use chrono::{Local, NaiveDate, TimeZone};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

const EXPORT_FILE_PREFIX: &str = "notetmp";
const EXPORT_FILE_EXTENSION: &str = "txt";
const MAX_NAME_ATTEMPTS: u32 = 1000;

#[derive(Debug)]
pub enum ExportError {
    EmptyContent,
    InvalidTimestamp(i64),
    NoFreeFileName(PathBuf),
    Io(std::io::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent => write!(f, "nothing to export"),
            Self::InvalidTimestamp(ms) => write!(f, "timestamp {ms} has no calendar date"),
            Self::NoFreeFileName(dir) => {
                write!(f, "no free export file name in `{}`", dir.display())
            }
            Self::Io(err) => write!(f, "export failed: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// File name for an export made on `date`.
pub fn export_file_name_for(date: NaiveDate) -> String {
    format!(
        "{EXPORT_FILE_PREFIX}-{}.{EXPORT_FILE_EXTENSION}",
        date.format("%Y-%m-%d")
    )
}

/// File name for an export made at `now_ms`, using the local calendar date.
pub fn export_file_name(now_ms: i64) -> Result<String, ExportError> {
    let local = Local
        .timestamp_millis_opt(now_ms)
        .single()
        .ok_or(ExportError::InvalidTimestamp(now_ms))?;
    Ok(export_file_name_for(local.date_naive()))
}

/// Writes `content` into `dir` and returns the created file path.
pub fn export_to_dir(
    dir: impl AsRef<Path>,
    content: &str,
    now_ms: i64,
) -> Result<PathBuf, ExportError> {
    if content.is_empty() {
        return Err(ExportError::EmptyContent);
    }
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let file_name = export_file_name(now_ms)?;
    let (path, mut file) = create_unused(dir, &file_name)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    info!(
        "event=note_export module=export status=ok bytes={} file={}",
        content.len(),
        path.display()
    );
    Ok(path)
}

/// Creates the first file in `dir` named `file_name`, `stem-2.txt`, ...
/// that does not exist yet. `create_new` makes the claim atomic, so a file
/// appearing concurrently is skipped rather than overwritten.
fn create_unused(dir: &Path, file_name: &str) -> Result<(PathBuf, File), ExportError> {
    let stem = file_name
        .strip_suffix(&format!(".{EXPORT_FILE_EXTENSION}"))
        .unwrap_or(file_name);
    let candidates = std::iter::once(dir.join(file_name)).chain(
        (2..=MAX_NAME_ATTEMPTS).map(|n| dir.join(format!("{stem}-{n}.{EXPORT_FILE_EXTENSION}"))),
    );

    for path in candidates {
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Err(ExportError::NoFreeFileName(dir.to_path_buf()))
}
