//! Repository layer: document ownership, CRUD, aggregates, projections.
//!
//! # Responsibility
//! - Own the in-memory document and the storage backend behind one API.
//! - Persist the whole document at the end of every mutating operation.
//!
//! # Invariants
//! - Derived aggregates are recomputed inside the mutation that changes
//!   their inputs, before the document is persisted.

pub mod export;
pub mod period_repo;

pub use period_repo::{PeriodRepository, RepoError, RepoResult, Statistics};
