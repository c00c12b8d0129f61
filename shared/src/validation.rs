//! Validation utilities for the Marketplace Business Portal

use rust_decimal::Decimal;

use crate::models::{CreateCatalogEntryInput, PayoutConfig, PayoutMethod};

// ============================================================================
// Account Validations
// ============================================================================

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() || !validator::validate_email(email) {
        return Err("Invalid email format");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain at least one digit");
    }
    Ok(())
}

/// Validate business name
pub fn validate_business_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Business name is required");
    }
    if name.len() > 120 {
        return Err("Business name must be at most 120 characters");
    }
    Ok(())
}

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate SKU format (up to 64 visible ASCII characters, no whitespace).
/// Empty SKUs are allowed: legacy entries are identified by internal id only.
pub fn validate_sku(sku: &str) -> Result<(), &'static str> {
    let sku = sku.trim();
    if sku.len() > 64 {
        return Err("SKU must be at most 64 characters");
    }
    if sku.chars().any(|c| c.is_whitespace() || !c.is_ascii_graphic()) {
        return Err("SKU must contain only visible ASCII characters");
    }
    Ok(())
}

/// Validate catalog entry invariants: non-negative price and stock
pub fn validate_catalog_entry(input: &CreateCatalogEntryInput) -> Result<(), &'static str> {
    if input.name.trim().is_empty() {
        return Err("Product name is required");
    }
    if input.unit_price < Decimal::ZERO {
        return Err("Unit price cannot be negative");
    }
    if input.stock_quantity < 0 {
        return Err("Stock quantity cannot be negative");
    }
    validate_sku(&input.sku)
}

// ============================================================================
// Payout Validations
// ============================================================================

/// Validate that a payout configuration carries the fields its method needs
pub fn validate_payout_config(config: &PayoutConfig) -> Result<(), &'static str> {
    match config.method {
        PayoutMethod::BankTransfer => {
            let account = config.account_number.as_deref().unwrap_or("").trim();
            if account.is_empty() {
                return Err("Bank transfer requires an account number");
            }
            if !account.chars().all(|c| c.is_ascii_digit() || c == '-') {
                return Err("Account number must be digits and dashes only");
            }
            if config.bank_name.as_deref().unwrap_or("").trim().is_empty() {
                return Err("Bank transfer requires a bank name");
            }
            Ok(())
        }
        PayoutMethod::Paypal => {
            let email = config.paypal_email.as_deref().unwrap_or("");
            validate_email(email).map_err(|_| "PayPal payout requires a valid PayPal email")
        }
        PayoutMethod::MobileWallet => {
            let number = config.account_number.as_deref().unwrap_or("").trim();
            if number.len() < 8 || !number.chars().all(|c| c.is_ascii_digit()) {
                return Err("Mobile wallet requires a numeric wallet id");
            }
            Ok(())
        }
    }
}
