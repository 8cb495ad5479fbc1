// src/jobs.rs

use std::time::Duration;

use chrono::Utc;
use sqlx::SqlitePool;
use tokio::task::JoinHandle;

use crate::{db, error::AppError};

/// Deletes every magic token that has already expired.
pub async fn sweep_expired_tokens(pool: &SqlitePool) -> Result<u64, AppError> {
    let removed = db::token::delete_expired_tokens(pool, Utc::now()).await?;
    if removed > 0 {
        tracing::info!("Deleted {} expired magic token(s)", removed);
    }
    Ok(removed)
}

/// Runs [`sweep_expired_tokens`] every `period` until the task is aborted.
/// A failed sweep is logged and retried on the next tick.
pub fn spawn_token_sweeper(pool: SqlitePool, period: Duration) -> JoinHandle<()> {
    let period = period.max(Duration::from_secs(1));

    tokio::spawn(async move {
        tracing::info!(
            "Expired token sweep scheduled every {}s",
            period.as_secs()
        );

        let mut interval_timer = tokio::time::interval(period);
        loop {
            interval_timer.tick().await;

            if let Err(e) = sweep_expired_tokens(&pool).await {
                tracing::warn!("Failed to delete expired tokens: {}", e);
            }
        }
    })
}
