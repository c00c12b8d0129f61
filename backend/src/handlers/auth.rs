//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::AuthService;
use crate::AppState;
use shared::models::{BusinessRole, RegisterBusinessInput};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub business_name: String,
    pub role: String,
    pub owner_name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub business_id: String,
    pub user_id: String,
    pub message: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub token: String,
}

#[derive(Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Signup endpoint handler
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let role = BusinessRole::parse(&body.role)
        .ok_or_else(|| AppError::validation("role", "Role must be seller, supplier or buyer"))?;

    let input = RegisterBusinessInput {
        business_name: body.business_name,
        role,
        owner_name: body.owner_name,
        email: body.email,
        password: body.password,
        phone: body.phone,
        address: body.address,
    };

    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let result = auth_service.signup(input, state.mailer.as_ref()).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            business_id: result.business_id.to_string(),
            user_id: result.user_id.to_string(),
            message: "Account created. Check your email for a verification link.".to_string(),
        }),
    ))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.login(&body.email, &body.password).await?;

    Ok(Json(TokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: tokens.token_type,
        expires_in: tokens.expires_in,
    }))
}

/// Refresh token endpoint handler
pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    let tokens = auth_service.refresh_token(&body.refresh_token).await?;

    Ok(Json(TokenResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        token_type: tokens.token_type,
        expires_in: tokens.expires_in,
    }))
}

/// Email verification endpoint handler
pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service.verify_email(&body.token).await?;

    Ok(Json(MessageResponse {
        message: "Email verified. You can now log in.".to_string(),
    }))
}

/// Password reset request endpoint handler
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service
        .request_password_reset(&body.email, state.mailer.as_ref())
        .await?;

    Ok(Json(MessageResponse {
        message: "If the address is registered, a reset mail is on its way.".to_string(),
    }))
}

/// Password reset confirmation endpoint handler
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(body): Json<PasswordResetConfirmRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let auth_service = AuthService::new(state.db.clone(), &state.config);
    auth_service
        .confirm_password_reset(&body.token, &body.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password updated. Log in with your new password.".to_string(),
    }))
}
