//! Use-case services over the repository.
//!
//! # Responsibility
//! - Validate user input against product limits before storage is touched.
//! - Provide the stable entry points presentation code calls.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Out-of-range values are rejected here; the repository trusts its
//!   callers.

pub mod mbo_service;

pub use mbo_service::{
    AchievementItemInput, AddGoalRequest, MboService, ServiceError, ValidationError,
};
