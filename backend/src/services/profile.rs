//! Business profile and payout configuration service

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::mail::{self, Mailer};
use shared::models::{Business, BusinessRole, PayoutConfig, PayoutMethod, UpdateProfileInput};
use shared::validation;

/// Profile service
#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

/// Input for replacing a payout configuration
#[derive(Debug, Deserialize)]
pub struct UpdatePayoutInput {
    pub method: PayoutMethod,
    pub account_number: Option<String>,
    pub account_holder: Option<String>,
    pub bank_name: Option<String>,
    pub paypal_email: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct BusinessRow {
    id: Uuid,
    name: String,
    role: String,
    email: String,
    phone: Option<String>,
    address: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct PayoutRow {
    business_id: Uuid,
    method: String,
    account_number: Option<String>,
    account_holder: Option<String>,
    bank_name: Option<String>,
    paypal_email: Option<String>,
    updated_at: DateTime<Utc>,
}

impl ProfileService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fetch the business profile
    pub async fn get_profile(&self, business_id: Uuid) -> AppResult<Business> {
        let row = sqlx::query_as::<_, BusinessRow>(
            r#"
            SELECT id, name, role, email, phone, address, created_at, updated_at
            FROM businesses
            WHERE id = $1
            "#,
        )
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Business".to_string()))?;

        Self::to_business(row)
    }

    /// Update the business profile fields that were provided
    pub async fn update_profile(
        &self,
        business_id: Uuid,
        input: UpdateProfileInput,
    ) -> AppResult<Business> {
        if let Some(name) = &input.business_name {
            validation::validate_business_name(name)
                .map_err(|msg| AppError::validation("business_name", msg))?;
        }

        let row = sqlx::query_as::<_, BusinessRow>(
            r#"
            UPDATE businesses
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, role, email, phone, address, created_at, updated_at
            "#,
        )
        .bind(business_id)
        .bind(&input.business_name)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Business".to_string()))?;

        Self::to_business(row)
    }

    /// Fetch the payout configuration
    pub async fn get_payout_config(&self, business_id: Uuid) -> AppResult<PayoutConfig> {
        let row = sqlx::query_as::<_, PayoutRow>(
            r#"
            SELECT business_id, method, account_number, account_holder,
                   bank_name, paypal_email, updated_at
            FROM payout_configs
            WHERE business_id = $1
            "#,
        )
        .bind(business_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Payout configuration".to_string()))?;

        Self::to_payout_config(row)
    }

    /// Replace the payout configuration and notify the account email
    pub async fn update_payout_config(
        &self,
        business_id: Uuid,
        input: UpdatePayoutInput,
        mailer: &dyn Mailer,
    ) -> AppResult<PayoutConfig> {
        let candidate = PayoutConfig {
            business_id,
            method: input.method,
            account_number: input.account_number,
            account_holder: input.account_holder,
            bank_name: input.bank_name,
            paypal_email: input.paypal_email,
            updated_at: Utc::now(),
        };

        validation::validate_payout_config(&candidate)
            .map_err(|msg| AppError::validation("payout", msg))?;

        let row = sqlx::query_as::<_, PayoutRow>(
            r#"
            INSERT INTO payout_configs
                (business_id, method, account_number, account_holder, bank_name, paypal_email)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (business_id) DO UPDATE
            SET method = EXCLUDED.method,
                account_number = EXCLUDED.account_number,
                account_holder = EXCLUDED.account_holder,
                bank_name = EXCLUDED.bank_name,
                paypal_email = EXCLUDED.paypal_email,
                updated_at = NOW()
            RETURNING business_id, method, account_number, account_holder,
                      bank_name, paypal_email, updated_at
            "#,
        )
        .bind(business_id)
        .bind(candidate.method.as_str())
        .bind(&candidate.account_number)
        .bind(&candidate.account_holder)
        .bind(&candidate.bank_name)
        .bind(&candidate.paypal_email)
        .fetch_one(&self.db)
        .await?;

        // Payout changes are security-sensitive; notify the account email.
        // Delivery failure must not roll back the saved configuration.
        let email = sqlx::query_scalar::<_, String>("SELECT email FROM businesses WHERE id = $1")
            .bind(business_id)
            .fetch_one(&self.db)
            .await?;

        if let Err(e) = mailer.send(&mail::payout_changed_mail(&email)).await {
            tracing::warn!("Failed to send payout-changed notice: {}", e);
        }

        Self::to_payout_config(row)
    }

    fn to_business(row: BusinessRow) -> AppResult<Business> {
        let role = BusinessRole::parse(&row.role)
            .ok_or_else(|| AppError::Internal(format!("Unknown business role: {}", row.role)))?;

        Ok(Business {
            id: row.id,
            name: row.name,
            role,
            email: row.email,
            phone: row.phone,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn to_payout_config(row: PayoutRow) -> AppResult<PayoutConfig> {
        let method = match row.method.as_str() {
            "bank_transfer" => PayoutMethod::BankTransfer,
            "paypal" => PayoutMethod::Paypal,
            "mobile_wallet" => PayoutMethod::MobileWallet,
            other => {
                return Err(AppError::Internal(format!("Unknown payout method: {}", other)));
            }
        };

        Ok(PayoutConfig {
            business_id: row.business_id,
            method,
            account_number: row.account_number,
            account_holder: row.account_holder,
            bank_name: row.bank_name,
            paypal_email: row.paypal_email,
            updated_at: row.updated_at,
        })
    }
}
