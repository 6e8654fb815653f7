//! Core logic for the roster tool.
//! Owns the user record model, the delimited file store and its operations.

pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::user::{is_valid_email, UserRecord, UserValidationError};
pub use repo::user_repo::{
    ErrorKind, FileUserRepository, RepoError, RepoResult, UpdateUserRequest, UserRepository,
};
pub use service::user_service::{
    ListReport, OperationReport, ReportLevel, UserService, NO_USERS_MESSAGE,
};
pub use store::{InitOutcome, StoreError, HEADER};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
