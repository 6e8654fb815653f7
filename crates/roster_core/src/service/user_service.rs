//! User roster service.
//!
//! # Responsibility
//! - Expose create/list/update/delete as report-returning entry points.
//! - Convert every repository error into a message instead of propagating it.
//!
//! # Invariants
//! - Service calls never panic or return `Err`; failures are reports.
//! - Validation and not-found outcomes are warnings; filesystem failures are
//!   errors.

use crate::model::user::UserRecord;
use crate::repo::user_repo::{
    ErrorKind, RepoError, RepoResult, UpdateUserRequest, UserRepository,
};
use crate::store::InitOutcome;
use log::{error, info, warn};

pub const NO_USERS_MESSAGE: &str = "No users found.";

/// Severity attached to an operation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

/// Caller-facing description of one operation outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReport {
    pub level: ReportLevel,
    pub message: String,
    /// Set for failed operations.
    pub error_kind: Option<ErrorKind>,
}

impl OperationReport {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: ReportLevel::Info,
            message: message.into(),
            error_kind: None,
        }
    }

    fn failure(err: &RepoError) -> Self {
        let level = match err.kind() {
            ErrorKind::Validation | ErrorKind::NotFound => ReportLevel::Warning,
            ErrorKind::Permission | ErrorKind::Io => ReportLevel::Error,
        };
        let message = match err {
            RepoError::StoreMissing(_) | RepoError::PermissionDenied(_) => err.to_string(),
            _ => format!("Error: {err}"),
        };
        Self {
            level,
            message,
            error_kind: Some(err.kind()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error_kind.is_none()
    }
}

/// Outcome of `UserService::list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListReport {
    /// Records in file order; never empty.
    Users(Vec<UserRecord>),
    /// Store holds only the header.
    Empty,
    Failed(OperationReport),
}

/// Use-case facade over a `UserRepository`.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Ensures the backing file exists.
    pub fn initialize(&self) -> OperationReport {
        match self.repo.initialize() {
            Ok(InitOutcome::Created) => {
                info!("event=user_init module=service status=ok outcome=created");
                OperationReport::info("User file created successfully.")
            }
            Ok(InitOutcome::AlreadyExists) => {
                info!("event=user_init module=service status=ok outcome=exists");
                OperationReport::info("User file already exists.")
            }
            Err(err) => report_failure("user_init", &err),
        }
    }

    /// Adds one user. All fields are required.
    pub fn create(&self, id: &str, name: &str, email: &str) -> OperationReport {
        let result = UserRecord::new(id, name, email)
            .map_err(RepoError::from)
            .and_then(|record| self.repo.create_user(&record).map(|()| record));

        match result {
            Ok(record) => {
                info!(
                    "event=user_create module=service status=ok id={}",
                    record.id
                );
                OperationReport::info("User added successfully.")
            }
            Err(err) => report_failure("user_create", &err),
        }
    }

    /// Lists all users in file order.
    pub fn list(&self) -> ListReport {
        match self.repo.list_users() {
            Ok(records) if records.is_empty() => {
                info!("event=user_list module=service status=ok count=0");
                ListReport::Empty
            }
            Ok(records) => {
                info!(
                    "event=user_list module=service status=ok count={}",
                    records.len()
                );
                ListReport::Users(records)
            }
            Err(err) => ListReport::Failed(report_failure("user_list", &err)),
        }
    }

    /// Updates name and/or email; blank values keep the current field.
    pub fn update(&self, request: &UpdateUserRequest) -> OperationReport {
        finish_mutation("user_update", self.repo.update_user(request), |record| {
            info!(
                "event=user_update module=service status=ok id={}",
                record.id
            );
            "User updated successfully."
        })
    }

    /// Removes the user with `id`.
    pub fn delete(&self, id: &str) -> OperationReport {
        finish_mutation("user_delete", self.repo.delete_user(id), |record| {
            info!(
                "event=user_delete module=service status=ok id={}",
                record.id
            );
            "User deleted successfully."
        })
    }
}

fn finish_mutation(
    event: &str,
    result: RepoResult<UserRecord>,
    on_success: impl FnOnce(&UserRecord) -> &'static str,
) -> OperationReport {
    match result {
        Ok(record) => OperationReport::info(on_success(&record)),
        Err(err) => report_failure(event, &err),
    }
}

fn report_failure(event: &str, err: &RepoError) -> OperationReport {
    let report = OperationReport::failure(err);
    match report.level {
        ReportLevel::Warning => warn!(
            "event={event} module=service status=rejected kind={:?} error={}",
            err.kind(),
            err
        ),
        _ => error!(
            "event={event} module=service status=error kind={:?} error={}",
            err.kind(),
            err
        ),
    }
    report
}
