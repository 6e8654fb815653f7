//! Domain model for roster entries.
//!
//! # Responsibility
//! - Define the user record persisted by the store.
//! - Own field-level validation shared by create and update paths.
//!
//! # Invariants
//! - A `UserRecord` built through `UserRecord::new` always passes validation.
//! - Field values never contain the store delimiter.

pub mod user;
