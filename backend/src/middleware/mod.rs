//! Request middleware for the Marketplace Business Portal

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
