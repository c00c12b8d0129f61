//! Shared types and models for the Marketplace Business Portal
//!
//! This crate contains the domain models shared across the portal backend,
//! plus the pure sales analytics engine. Nothing in here performs I/O; the
//! backend fetches request-scoped snapshots and hands them to `analytics`.

pub mod analytics;
pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
