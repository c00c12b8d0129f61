//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user account on the portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub business_id: Uuid,
    pub email: String,
    pub name: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kinds of one-time account tokens sent by email
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountTokenKind {
    EmailVerification,
    PasswordReset,
}

impl AccountTokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountTokenKind::EmailVerification => "email_verification",
            AccountTokenKind::PasswordReset => "password_reset",
        }
    }

    /// Token lifetime in seconds
    pub fn lifetime_secs(&self) -> i64 {
        match self {
            AccountTokenKind::EmailVerification => 24 * 3600,
            AccountTokenKind::PasswordReset => 3600,
        }
    }
}
