// src/handlers/mod.rs

use sqlx::SqlitePool;

use crate::{db, error::AppError, models::user::User, utils::jwt::Claims};

pub mod auth;
pub mod community;
pub mod interaction;
pub mod profile;

/// Default page sizes for listings.
pub const POSTS_PAGE_SIZE: i64 = 10;
pub const COMMENTS_PAGE_SIZE: i64 = 5;

/// Loads the user behind a session; a session for a deleted user is rejected.
pub(crate) async fn require_user(pool: &SqlitePool, claims: &Claims) -> Result<User, AppError> {
    let user_id = claims.user_id()?;

    db::user::get_user_by_id(pool, user_id)
        .await?
        .ok_or(AppError::AuthError("User not found".to_string()))
}
