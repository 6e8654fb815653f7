//! Delimited flat-file storage for the roster.
//!
//! # Responsibility
//! - Encode/decode the `ID,Name,Email` text format.
//! - Create, read and atomically replace the backing file.
//!
//! # Invariants
//! - Persisted content always starts with `HEADER`, even with zero records.
//! - Every line, including the last, ends with `\n`.
//! - Full rewrites go through a temp file + rename, never in-place truncation.

use crate::model::user::{UserRecord, FIELD_DELIMITER};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

mod file;

pub use file::{initialize_store, read_store, replace_store, InitOutcome};

/// Fixed first line of every store file.
pub const HEADER: &str = "ID,Name,Email";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Backing file does not exist.
    Missing(PathBuf),
    /// Filesystem refused access to the backing file.
    PermissionDenied(PathBuf),
    Io(io::Error),
    /// File content does not follow the store format.
    InvalidData(String),
}

impl StoreError {
    /// Maps an I/O error on `path` onto the store taxonomy.
    pub(crate) fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::Missing(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "File '{}' not found.", path.display()),
            Self::PermissionDenied(path) => {
                write!(f, "Permission denied: cannot access '{}'", path.display())
            }
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid store data: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

/// Decodes full file content into records, in file order.
///
/// Blank lines are ignored. The first non-blank line must be `HEADER`.
///
/// # Errors
/// - `InvalidData` when the header is missing or a row does not have exactly
///   three non-empty fields.
pub fn parse_store(content: &str) -> StoreResult<Vec<UserRecord>> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    match lines.next() {
        Some((_, HEADER)) => {}
        Some((line_no, other)) => {
            return Err(StoreError::InvalidData(format!(
                "line {line_no}: expected header `{HEADER}`, found `{other}`"
            )));
        }
        None => {
            return Err(StoreError::InvalidData(format!(
                "missing header `{HEADER}`"
            )));
        }
    }

    let mut records = Vec::new();
    for (line_no, line) in lines {
        records.push(parse_row(line_no, line)?);
    }
    Ok(records)
}

/// Encodes records into full file content, header first.
pub fn render_store(records: &[UserRecord]) -> String {
    let mut content = String::with_capacity(HEADER.len() + 1 + records.len() * 32);
    content.push_str(HEADER);
    content.push('\n');
    for record in records {
        content.push_str(&record.to_line());
        content.push('\n');
    }
    content
}

fn parse_row(line_no: usize, line: &str) -> StoreResult<UserRecord> {
    let fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    match fields.as_slice() {
        [id, name, email] if !id.is_empty() && !name.is_empty() && !email.is_empty() => {
            Ok(UserRecord {
                id: (*id).to_string(),
                name: (*name).to_string(),
                email: (*email).to_string(),
            })
        }
        _ => Err(StoreError::InvalidData(format!(
            "line {line_no}: expected `id,name,email`, found `{line}`"
        ))),
    }
}
