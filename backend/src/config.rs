//! Configuration management for the Marketplace Business Portal
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PORTAL_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Transactional mail configuration
    pub mail: MailConfig,

    /// Analytics configuration
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    /// Transactional mail API endpoint
    pub api_endpoint: String,

    /// Mail API key
    pub api_key: String,

    /// Sender address for portal mail
    pub from_address: String,

    /// Base URL used in verification and reset links
    pub portal_base_url: String,
}

/// Per-role low-stock thresholds. Seller, supplier and buyer dashboards
/// historically used different cutoffs, so the threshold is configuration,
/// not a constant.
#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsConfig {
    pub seller_low_stock_threshold: i64,
    pub supplier_low_stock_threshold: i64,
    pub buyer_low_stock_threshold: i64,
}

impl AnalyticsConfig {
    pub fn low_stock_threshold(&self, role: shared::models::BusinessRole) -> i64 {
        use shared::models::BusinessRole;
        match role {
            BusinessRole::Seller => self.seller_low_stock_threshold,
            BusinessRole::Supplier => self.supplier_low_stock_threshold,
            BusinessRole::Buyer => self.buyer_low_stock_threshold,
        }
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("PORTAL_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            .set_default("mail.from_address", "no-reply@portal.example")?
            .set_default("mail.portal_base_url", "http://localhost:3000")?
            .set_default("analytics.seller_low_stock_threshold", 10)?
            .set_default("analytics.supplier_low_stock_threshold", 20)?
            .set_default("analytics.buyer_low_stock_threshold", 5)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PORTAL_ prefix)
            .add_source(
                Environment::with_prefix("PORTAL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
