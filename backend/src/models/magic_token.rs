use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A one-time login token, as stored in the 'magic_tokens' table.
///
/// The id is a random UUID and is the secret mailed to the user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MagicToken {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MagicToken {
    /// A token stays redeemable up to and including its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
