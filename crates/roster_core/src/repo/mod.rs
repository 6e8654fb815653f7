//! Repository layer over the roster store.
//!
//! # Responsibility
//! - Define the Record Store contract (initialize/create/list/update/delete).
//! - Keep file format and filesystem details out of the service layer.
//!
//! # Invariants
//! - Input validation runs before any read-modify-write cycle.
//! - Failed operations leave the backing file byte-for-byte unchanged.

pub mod user_repo;
