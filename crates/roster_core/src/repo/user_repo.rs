//! User repository contract and flat-file implementation.
//!
//! # Responsibility
//! - Provide the roster CRUD operations over one delimited file.
//! - Translate store failures into semantic repository errors.
//!
//! # Invariants
//! - `id` is unique across records after every successful operation.
//! - Every call re-reads the file; nothing is cached between calls.
//! - Single writer only: concurrent processes mutating one file may lose
//!   updates.

use crate::model::user::{check_field, is_valid_email, UserRecord, UserValidationError};
use crate::store::{
    initialize_store, parse_store, read_store, render_store, replace_store, InitOutcome,
    StoreError,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type RepoResult<T> = Result<T, RepoError>;

/// Coarse error taxonomy reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Permission,
    Io,
}

/// Repository error for roster operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(UserValidationError),
    DuplicateId(String),
    /// No record carries this id.
    NotFound(String),
    /// Backing file is absent; `initialize` was never called.
    StoreMissing(PathBuf),
    PermissionDenied(PathBuf),
    Io(io::Error),
    InvalidData(String),
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::DuplicateId(_) => ErrorKind::Validation,
            Self::NotFound(_) | Self::StoreMissing(_) => ErrorKind::NotFound,
            Self::PermissionDenied(_) => ErrorKind::Permission,
            Self::Io(_) | Self::InvalidData(_) => ErrorKind::Io,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateId(id) => write!(f, "User ID {id} already exists."),
            Self::NotFound(id) => write!(f, "User ID {id} not found."),
            Self::StoreMissing(path) => write!(f, "File '{}' not found.", path.display()),
            Self::PermissionDenied(path) => {
                write!(f, "Permission denied: cannot access '{}'", path.display())
            }
            Self::Io(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid store data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Missing(path) => Self::StoreMissing(path),
            StoreError::PermissionDenied(path) => Self::PermissionDenied(path),
            StoreError::Io(err) => Self::Io(err),
            StoreError::InvalidData(message) => Self::InvalidData(message),
        }
    }
}

/// Partial update for one record.
///
/// `None` or a blank value leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserRequest {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateUserRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Repository interface for roster operations.
pub trait UserRepository {
    fn initialize(&self) -> RepoResult<InitOutcome>;
    fn create_user(&self, record: &UserRecord) -> RepoResult<()>;
    /// Returns records in file order; an empty vec means header only.
    fn list_users(&self) -> RepoResult<Vec<UserRecord>>;
    fn update_user(&self, request: &UpdateUserRequest) -> RepoResult<UserRecord>;
    fn delete_user(&self, id: &str) -> RepoResult<UserRecord>;
}

/// Store handle bound to one roster file.
#[derive(Debug, Clone)]
pub struct FileUserRepository {
    path: PathBuf,
}

impl FileUserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> RepoResult<Vec<UserRecord>> {
        let content = read_store(&self.path)?;
        Ok(parse_store(&content)?)
    }
}

impl UserRepository for FileUserRepository {
    fn initialize(&self) -> RepoResult<InitOutcome> {
        Ok(initialize_store(&self.path)?)
    }

    fn create_user(&self, record: &UserRecord) -> RepoResult<()> {
        // Records may be built field-by-field, bypassing `UserRecord::new`.
        let validated = UserRecord::new(&record.id, &record.name, &record.email)?;

        let mut records = self.load()?;
        if records.iter().any(|existing| existing.id == validated.id) {
            return Err(RepoError::DuplicateId(validated.id));
        }

        records.push(validated);
        replace_store(&self.path, &render_store(&records))?;
        Ok(())
    }

    fn list_users(&self) -> RepoResult<Vec<UserRecord>> {
        self.load()
    }

    fn update_user(&self, request: &UpdateUserRequest) -> RepoResult<UserRecord> {
        let id = required_id(&request.id)?;
        let new_name = non_blank(request.name.as_deref());
        let new_email = non_blank(request.email.as_deref());
        if let Some(name) = new_name {
            check_field("name", name)?;
        }
        if let Some(email) = new_email {
            check_field("email", email)?;
            if !is_valid_email(email) {
                return Err(UserValidationError::InvalidEmail(email.to_string()).into());
            }
        }

        let mut records = self.load()?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        if let Some(name) = new_name {
            record.name = name.to_string();
        }
        if let Some(email) = new_email {
            record.email = email.to_string();
        }
        let updated = record.clone();

        replace_store(&self.path, &render_store(&records))?;
        Ok(updated)
    }

    fn delete_user(&self, id: &str) -> RepoResult<UserRecord> {
        let id = required_id(id)?;

        let mut records = self.load()?;
        let position = records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| RepoError::NotFound(id.to_string()))?;
        let removed = records.remove(position);

        replace_store(&self.path, &render_store(&records))?;
        Ok(removed)
    }
}

fn required_id(id: &str) -> RepoResult<&str> {
    let id = id.trim();
    if id.is_empty() {
        return Err(UserValidationError::MissingId.into());
    }
    Ok(id)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
