//! Business logic services for the Marketplace Business Portal

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod mail;
pub mod profile;

pub use analytics::AnalyticsService;
pub use auth::AuthService;
pub use catalog::CatalogService;
pub use mail::{HttpMailer, Mailer};
pub use profile::ProfileService;
