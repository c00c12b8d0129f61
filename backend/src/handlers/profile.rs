//! Business profile and payout configuration handlers

use axum::{extract::State, Json};

use crate::error::AppError;
use crate::middleware::CurrentUser;
use crate::services::{profile::UpdatePayoutInput, ProfileService};
use crate::AppState;
use shared::models::{Business, PayoutConfig, UpdateProfileInput};

/// Get the authenticated business's profile
pub async fn get_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Business>, AppError> {
    let service = ProfileService::new(state.db.clone());
    let business = service.get_profile(user.business_id).await?;
    Ok(Json(business))
}

/// Update the authenticated business's profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdateProfileInput>,
) -> Result<Json<Business>, AppError> {
    let service = ProfileService::new(state.db.clone());
    let business = service.update_profile(user.business_id, body).await?;
    Ok(Json(business))
}

/// Get the payout configuration
pub async fn get_payout_config(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PayoutConfig>, AppError> {
    let service = ProfileService::new(state.db.clone());
    let config = service.get_payout_config(user.business_id).await?;
    Ok(Json(config))
}

/// Replace the payout configuration
pub async fn update_payout_config(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<UpdatePayoutInput>,
) -> Result<Json<PayoutConfig>, AppError> {
    let service = ProfileService::new(state.db.clone());
    let config = service
        .update_payout_config(user.business_id, body, state.mailer.as_ref())
        .await?;
    Ok(Json(config))
}
