//! Business and payout models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Roles a business can hold on the marketplace
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BusinessRole {
    Seller,
    Supplier,
    Buyer,
}

impl BusinessRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessRole::Seller => "seller",
            BusinessRole::Supplier => "supplier",
            BusinessRole::Buyer => "buyer",
        }
    }

    /// Parse a role string as stored in the database
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "seller" => Some(BusinessRole::Seller),
            "supplier" => Some(BusinessRole::Supplier),
            "buyer" => Some(BusinessRole::Buyer),
            _ => None,
        }
    }
}

/// A registered business on the portal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub role: BusinessRole,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payout methods supported by the portal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMethod {
    BankTransfer,
    Paypal,
    MobileWallet,
}

impl PayoutMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PayoutMethod::BankTransfer => "bank_transfer",
            PayoutMethod::Paypal => "paypal",
            PayoutMethod::MobileWallet => "mobile_wallet",
        }
    }
}

/// Payout configuration for a business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutConfig {
    pub business_id: Uuid,
    pub method: PayoutMethod,
    /// Bank account or wallet number, depending on method
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
    pub bank_name: Option<String>,
    /// PayPal email when method is Paypal
    pub paypal_email: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a new business
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterBusinessInput {
    pub business_name: String,
    pub role: BusinessRole,
    pub owner_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Input for updating a business profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileInput {
    pub business_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
