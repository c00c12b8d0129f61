//! Marketplace Business Portal - Backend library
//!
//! Exposes the application modules for the `portal-server` binary and for
//! integration tests.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::Config;

use services::mail::Mailer;

/// Application state shared across handlers.
///
/// Collaborators are injected here rather than reached through globals so
/// tests can substitute them.
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    pub mailer: Arc<dyn Mailer>,
}
