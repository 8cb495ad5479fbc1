use async_trait::async_trait;

use crate::{error::AppError, models::magic_token::MagicToken};

/// Outbound delivery of login tokens.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_magic_token(&self, recipient: &str, token: &MagicToken) -> Result<(), AppError>;
}

/// Writes deliveries to the log instead of sending email.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_magic_token(&self, recipient: &str, token: &MagicToken) -> Result<(), AppError> {
        tracing::info!(
            recipient,
            expires_at = %token.expires_at,
            "Magic token issued"
        );
        tracing::debug!(token = %token.id, "Magic token value");
        Ok(())
    }
}
