//! Authentication service: signup, login, token rotation, email
//! verification and password reset

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::mail::{self, Mailer};
use shared::models::{AccountTokenKind, BusinessRole, RegisterBusinessInput};
use shared::validation;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
    refresh_token_expiry: i64,
    portal_base_url: String,
}

/// Response after successful signup. Tokens are withheld until the email
/// address is verified.
#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub business_id: Uuid,
    pub user_id: Uuid,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub business_id: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// User info from database
#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub business_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub email_verified_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_active: bool,
    pub role: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            refresh_token_expiry: config.jwt.refresh_token_expiry,
            portal_base_url: config.mail.portal_base_url.clone(),
        }
    }

    /// Register a new business with its owner account and send the
    /// verification mail
    pub async fn signup(
        &self,
        input: RegisterBusinessInput,
        mailer: &dyn Mailer,
    ) -> AppResult<SignupResponse> {
        validation::validate_business_name(&input.business_name)
            .map_err(|msg| AppError::validation("business_name", msg))?;
        validation::validate_email(&input.email)
            .map_err(|msg| AppError::validation("email", msg))?;
        validation::validate_password(&input.password)
            .map_err(|msg| AppError::validation("password", msg))?;

        // Check if email already registered
        let existing =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
                .bind(&input.email)
                .fetch_one(&self.db)
                .await?;

        if existing > 0 {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        // Hash password
        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        // Start transaction
        let mut tx = self.db.begin().await?;

        // Create business
        let business_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO businesses (name, role, email, phone, address)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&input.business_name)
        .bind(input.role.as_str())
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .fetch_one(&mut *tx)
        .await?;

        // Create owner user (unverified)
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (business_id, email, password_hash, name)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(business_id)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(&input.owner_name)
        .fetch_one(&mut *tx)
        .await?;

        // Issue verification token
        let token = Uuid::new_v4().to_string();
        let kind = AccountTokenKind::EmailVerification;
        let expires_at = Utc::now() + Duration::seconds(kind.lifetime_secs());

        sqlx::query(
            r#"
            INSERT INTO account_tokens (user_id, token, kind, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(&token)
        .bind(kind.as_str())
        .bind(expires_at)
        .execute(&mut *tx)
        .await?;

        // Commit transaction
        tx.commit().await?;

        // Send verification mail
        let message = mail::verification_mail(&input.email, &self.portal_base_url, &token);
        mailer.send(&message).await?;

        Ok(SignupResponse {
            business_id,
            user_id,
        })
    }

    /// Authenticate user with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthTokens> {
        // Find user with the owning business's role
        let user = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT u.id, u.business_id, u.email, u.password_hash, u.name,
                   u.email_verified_at, u.is_active, b.role
            FROM users u
            JOIN businesses b ON b.id = u.business_id
            WHERE u.email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        // Check if user is active
        if !user.is_active {
            return Err(AppError::Unauthorized("Account is disabled".to_string()));
        }

        // Verify password before revealing verification state
        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        if user.email_verified_at.is_none() {
            return Err(AppError::EmailNotVerified);
        }

        // Update last login
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(user.id)
            .execute(&self.db)
            .await?;

        // Generate tokens
        let tokens = self.generate_tokens(user.id, user.business_id, &user.role)?;

        // Store refresh token
        self.store_refresh_token(user.id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Refresh access token using refresh token
    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<AuthTokens> {
        // Hash the refresh token to look up
        let token_hash = Self::hash_token(refresh_token);

        // Find valid refresh token
        let token_record = sqlx::query_as::<_, (Uuid, Uuid, String)>(
            r#"
            SELECT rt.user_id, u.business_id, b.role
            FROM refresh_tokens rt
            JOIN users u ON u.id = rt.user_id
            JOIN businesses b ON b.id = u.business_id
            WHERE rt.token_hash = $1
              AND rt.expires_at > NOW()
              AND rt.revoked_at IS NULL
              AND u.is_active = true
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        let (user_id, business_id, role) = token_record;

        // Revoke old refresh token
        sqlx::query("UPDATE refresh_tokens SET revoked_at = NOW() WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.db)
            .await?;

        // Generate new tokens
        let tokens = self.generate_tokens(user_id, business_id, &role)?;

        // Store new refresh token
        self.store_refresh_token(user_id, &tokens.refresh_token)
            .await?;

        Ok(tokens)
    }

    /// Verify an email address with a one-time token
    pub async fn verify_email(&self, token: &str) -> AppResult<()> {
        let user_id = self
            .consume_token(token, AccountTokenKind::EmailVerification)
            .await?;

        sqlx::query("UPDATE users SET email_verified_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Request a password reset mail. Always succeeds so callers cannot
    /// probe which addresses are registered.
    pub async fn request_password_reset(&self, email: &str, mailer: &dyn Mailer) -> AppResult<()> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE email = $1 AND is_active = true",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?;

        let Some(user_id) = user_id else {
            tracing::debug!("Password reset requested for unknown email");
            return Ok(());
        };

        let token = Uuid::new_v4().to_string();
        let kind = AccountTokenKind::PasswordReset;
        let expires_at = Utc::now() + Duration::seconds(kind.lifetime_secs());

        sqlx::query(
            r#"
            INSERT INTO account_tokens (user_id, token, kind, expires_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(user_id)
        .bind(&token)
        .bind(kind.as_str())
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        let message = mail::password_reset_mail(email, &self.portal_base_url, &token);
        mailer.send(&message).await?;

        Ok(())
    }

    /// Set a new password with a one-time reset token
    pub async fn confirm_password_reset(&self, token: &str, new_password: &str) -> AppResult<()> {
        validation::validate_password(new_password)
            .map_err(|msg| AppError::validation("password", msg))?;

        let user_id = self
            .consume_token(token, AccountTokenKind::PasswordReset)
            .await?;

        let password_hash = hash(new_password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
            .bind(&password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        // Existing sessions must not survive a password reset
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW() WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        Ok(token_data.claims)
    }

    /// Look up an unexpired, unused account token, mark it used and return
    /// the owning user
    async fn consume_token(&self, token: &str, kind: AccountTokenKind) -> AppResult<Uuid> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            UPDATE account_tokens
            SET used_at = NOW()
            WHERE token = $1
              AND kind = $2
              AND expires_at > NOW()
              AND used_at IS NULL
            RETURNING user_id
            "#,
        )
        .bind(token)
        .bind(kind.as_str())
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidToken)?;

        Ok(user_id)
    }

    /// Generate access and refresh tokens
    fn generate_tokens(
        &self,
        user_id: Uuid,
        business_id: Uuid,
        role: &str,
    ) -> AppResult<AuthTokens> {
        // The role string comes from the businesses table; reject rows the
        // vocabulary does not know rather than minting a token for them
        let role = BusinessRole::parse(role)
            .ok_or_else(|| AppError::Internal(format!("Unknown business role: {}", role)))?;

        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let access_claims = Claims {
            sub: user_id.to_string(),
            business_id: business_id.to_string(),
            role: role.as_str().to_string(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &access_claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        // Refresh token (simple random token)
        let refresh_token = Uuid::new_v4().to_string();

        Ok(AuthTokens {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }

    /// Store refresh token in database
    async fn store_refresh_token(&self, user_id: Uuid, token: &str) -> AppResult<()> {
        let token_hash = Self::hash_token(token);
        let expires_at = Utc::now() + Duration::seconds(self.refresh_token_expiry);

        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    /// Hash a token for storage
    fn hash_token(token: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }
}
