//! Database models for the Marketplace Business Portal
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
