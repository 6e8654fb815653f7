//! Roster use-case services.
//!
//! # Responsibility
//! - Turn repository outcomes into caller-facing reports.
//! - Emit one outcome log event per operation.

pub mod user_service;
