//! Backing file lifecycle: create, read, replace.
//!
//! # Invariants
//! - `initialize_store` never overwrites an existing file.
//! - The live file is never written in place; new content always lands via
//!   a synced temp file and a rename.

use super::{StoreError, StoreResult, HEADER};
use log::{error, info};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tempfile::{Builder, NamedTempFile};

/// Result of `initialize_store`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// File was absent and has been created with the header.
    Created,
    /// File already existed; content untouched.
    AlreadyExists,
}

/// Creates the store file containing only the header, if absent.
///
/// # Errors
/// - `PermissionDenied` when the filesystem refuses creation.
/// - `Io` for any other creation failure (including a missing parent dir).
pub fn initialize_store(path: &Path) -> StoreResult<InitOutcome> {
    let started_at = Instant::now();
    let result = create_with_header(path);

    match &result {
        Ok(outcome) => info!(
            "event=store_init module=store status=ok outcome={outcome:?} path={} duration_ms={}",
            path.display(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=store_init module=store status=error path={} duration_ms={} error={}",
            path.display(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn create_with_header(path: &Path) -> StoreResult<InitOutcome> {
    if path.try_exists().map_err(|err| init_error(path, err))? {
        return Ok(InitOutcome::AlreadyExists);
    }

    let dir = parent_dir(path);
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Subject to umask, like a plain `File::create`.
        builder.permissions(fs::Permissions::from_mode(0o666));
    }
    let mut temp = builder
        .tempfile_in(dir)
        .map_err(|err| init_error(path, err))?;
    writeln!(temp, "{HEADER}").map_err(|err| init_error(path, err))?;
    temp.as_file()
        .sync_all()
        .map_err(|err| init_error(path, err))?;

    match temp.persist_noclobber(path) {
        Ok(_) => {
            sync_dir(dir);
            Ok(InitOutcome::Created)
        }
        Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
            Ok(InitOutcome::AlreadyExists)
        }
        Err(err) => Err(init_error(path, err.error)),
    }
}

/// Creation failures: a missing parent directory is a generic I/O error,
/// not a missing store.
fn init_error(path: &Path, err: io::Error) -> StoreError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => StoreError::PermissionDenied(path.to_path_buf()),
        _ => StoreError::Io(err),
    }
}

/// Reads the whole store file.
///
/// # Errors
/// - `Missing` when the file does not exist.
/// - `PermissionDenied` / `Io` for other read failures.
pub fn read_store(path: &Path) -> StoreResult<String> {
    fs::read_to_string(path).map_err(|err| {
        let err = StoreError::from_io(path, err);
        error!(
            "event=store_read module=store status=error path={} error={}",
            path.display(),
            err
        );
        err
    })
}

/// Atomically replaces the store file with `contents`.
///
/// Content is written to a temp file in the same directory, synced, then
/// renamed over `path`. Existing file permissions are carried over.
pub fn replace_store(path: &Path, contents: &str) -> StoreResult<()> {
    let started_at = Instant::now();
    let result = write_and_persist(path, contents);

    match &result {
        Ok(()) => info!(
            "event=store_replace module=store status=ok path={} bytes={} duration_ms={}",
            path.display(),
            contents.len(),
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=store_replace module=store status=error path={} duration_ms={} error={}",
            path.display(),
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn write_and_persist(path: &Path, contents: &str) -> StoreResult<()> {
    let dir = parent_dir(path);
    let to_store_err = |err: io::Error| StoreError::from_io(path, err);

    let permissions = fs::metadata(path).map_err(to_store_err)?.permissions();
    let mut temp = NamedTempFile::new_in(dir).map_err(to_store_err)?;
    temp.write_all(contents.as_bytes()).map_err(to_store_err)?;
    temp.as_file().sync_all().map_err(to_store_err)?;
    fs::set_permissions(temp.path(), permissions).map_err(to_store_err)?;
    temp.persist(path)
        .map_err(|err| StoreError::from_io(path, err.error))?;
    sync_dir(dir);
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn sync_dir(dir: &Path) {
    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(dir) {
            let _ = dir.sync_all();
        }
    }
    #[cfg(not(unix))]
    let _ = dir;
}
