// src/db/token.rs

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{error::AppError, models::magic_token::MagicToken};

/// Issues a token for `user_id` that expires `ttl` from now.
pub async fn create_magic_token(
    pool: &SqlitePool,
    user_id: i64,
    ttl: Duration,
) -> Result<MagicToken, AppError> {
    create_magic_token_at(pool, user_id, ttl, Utc::now()).await
}

pub async fn create_magic_token_at(
    pool: &SqlitePool,
    user_id: i64,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<MagicToken, AppError> {
    let token = MagicToken {
        id: Uuid::new_v4().to_string(),
        user_id,
        expires_at: now + ttl,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        r#"
        INSERT INTO magic_tokens (id, user_id, expires_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&token.id)
    .bind(token.user_id)
    .bind(token.expires_at)
    .bind(token.created_at)
    .bind(token.updated_at)
    .execute(pool)
    .await?;

    Ok(token)
}

pub async fn find_magic_token(pool: &SqlitePool, id: &str) -> Result<Option<MagicToken>, AppError> {
    let token = sqlx::query_as::<_, MagicToken>(
        "SELECT id, user_id, expires_at, created_at, updated_at FROM magic_tokens WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(token)
}

/// Whether the user already holds a token that has not expired at `now`.
pub async fn has_active_token(
    pool: &SqlitePool,
    user_id: i64,
    now: DateTime<Utc>,
) -> Result<bool, AppError> {
    let active: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM magic_tokens WHERE user_id = ? AND expires_at >= ?)",
    )
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(active)
}

/// Consumes a live token and returns its owner.
///
/// Returns `None` when the token is unknown or expired at `now`. The row is
/// deleted in the same statement, so a token can be redeemed once.
pub async fn redeem_magic_token(
    pool: &SqlitePool,
    id: &str,
    now: DateTime<Utc>,
) -> Result<Option<i64>, AppError> {
    let user_id: Option<i64> = sqlx::query_scalar(
        "DELETE FROM magic_tokens WHERE id = ? AND expires_at >= ? RETURNING user_id",
    )
    .bind(id)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(user_id)
}

/// Drops every token a user holds. Returns the number removed.
pub async fn delete_user_tokens(pool: &SqlitePool, user_id: i64) -> Result<u64, AppError> {
    let removed = sqlx::query("DELETE FROM magic_tokens WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(removed)
}

/// Drops every token that expired before `now`. Returns the number removed.
pub async fn delete_expired_tokens(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64, AppError> {
    let removed = sqlx::query("DELETE FROM magic_tokens WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(removed)
}
