//! Transactional mail collaborator
//!
//! The portal sends three kinds of mail: email verification, password reset
//! and payout-configuration-changed notices. Delivery goes through a
//! provider's HTTP API; the `Mailer` trait keeps the rest of the code and the
//! tests independent of that provider.

use async_trait::async_trait;
use serde::Serialize;

use crate::config::MailConfig;
use crate::error::{AppError, AppResult};

/// A single outbound mail.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound mail delivery. Injected through `AppState` so tests can
/// substitute a recording implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> AppResult<()>;
}

/// Mailer backed by a transactional-mail HTTP API.
#[derive(Clone)]
pub struct HttpMailer {
    api_endpoint: String,
    api_key: String,
    from_address: String,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
struct MailApiRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Self {
        Self {
            api_endpoint: config.api_endpoint.clone(),
            api_key: config.api_key.clone(),
            from_address: config.from_address.clone(),
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> AppResult<()> {
        let request = MailApiRequest {
            from: &self.from_address,
            to: &message.to,
            subject: &message.subject,
            text: &message.body,
        };

        let response = self
            .http_client
            .post(&self.api_endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::MailError(format!("Failed to reach mail API: {}", e)))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(AppError::MailError(format!(
                "Mail API returned {}: {}",
                status, body
            )))
        }
    }
}

/// Build the account-verification mail.
pub fn verification_mail(to: &str, portal_base_url: &str, token: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Verify your Marketplace Portal account".to_string(),
        body: format!(
            "Welcome to the Marketplace Business Portal.\n\n\
             Please verify your email address by opening the link below \
             within 24 hours:\n\n{}/verify-email?token={}\n\n\
             If you did not create this account, ignore this mail.",
            portal_base_url, token
        ),
    }
}

/// Build the password-reset mail.
pub fn password_reset_mail(to: &str, portal_base_url: &str, token: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Reset your Marketplace Portal password".to_string(),
        body: format!(
            "A password reset was requested for your account.\n\n\
             Open the link below within 1 hour to choose a new password:\n\n\
             {}/reset-password?token={}\n\n\
             If you did not request this, your password is unchanged.",
            portal_base_url, token
        ),
    }
}

/// Build the payout-configuration-changed notice.
pub fn payout_changed_mail(to: &str) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your payout configuration was updated".to_string(),
        body: "The payout configuration on your Marketplace Portal account \
               was just changed.\n\nIf this was not you, contact support \
               immediately."
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_mail_contains_token_link() {
        let mail = verification_mail("owner@shop.example", "https://portal.example", "tok-123");
        assert_eq!(mail.to, "owner@shop.example");
        assert!(mail.body.contains("https://portal.example/verify-email?token=tok-123"));
    }

    #[test]
    fn test_password_reset_mail_contains_token_link() {
        let mail = password_reset_mail("owner@shop.example", "https://portal.example", "tok-456");
        assert!(mail.body.contains("https://portal.example/reset-password?token=tok-456"));
        assert!(mail.body.contains("1 hour"));
    }
}
