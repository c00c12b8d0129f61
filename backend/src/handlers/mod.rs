//! HTTP request handlers for the Marketplace Business Portal

pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod health;
pub mod profile;

pub use auth::{
    confirm_password_reset, login, refresh, request_password_reset, signup, verify_email,
};
pub use catalog::{create_entry, get_entry, list_entries, update_entry};
pub use dashboard::{export_products_csv, get_dashboard};
pub use health::health_check;
pub use profile::{get_payout_config, get_profile, update_payout_config, update_profile};
