use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sqlx::SqlitePool;
use validator::Validate;

use super::{COMMENTS_PAGE_SIZE, POSTS_PAGE_SIZE, require_user};
use crate::{
    db,
    error::AppError,
    models::{
        comment::CommentFilter,
        pagination::PageParams,
        user::{AccountResponse, CreateUserRequest, NewUser},
    },
    utils::jwt::Claims,
};

/// Get current user's account and statistics.
pub async fn get_account(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user = require_user(&pool, &claims).await?;

    let posts_count = db::post::posts_count(&pool, Some(&user.username)).await?;
    let comments_count =
        db::comment::comments_count(&pool, &CommentFilter::Owner(user.username.clone())).await?;

    Ok(Json(AccountResponse {
        user,
        posts_count,
        comments_count,
    }))
}

/// Update the current user's details.
///
/// A new username is carried over to everything the user has written.
pub async fn update_account(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let user = require_user(&pool, &claims).await?;
    let changes = NewUser::from(payload);

    if user.matches(&changes) {
        return Err(AppError::BadRequest("No changes detected".to_string()));
    }
    if changes.email != user.email
        && db::user::get_user_by_email(&pool, &changes.email)
            .await?
            .is_some()
    {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if changes.username != user.username
        && db::user::get_user_by_username(&pool, &changes.username)
            .await?
            .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let updated = db::user::update_user(&pool, user.id, changes)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update user {}: {:?}", user.id, e);
            e
        })?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    Ok(Json(updated))
}

/// Posts written by one user, newest first.
pub async fn list_user_posts(
    State(pool): State<SqlitePool>,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.into_request(POSTS_PAGE_SIZE)?;

    let posts = db::post::get_posts_by_username(&pool, &username, page).await?;

    Ok(Json(posts))
}

/// Comments written by one user, at any depth, newest first.
pub async fn list_user_comments(
    State(pool): State<SqlitePool>,
    Path(username): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.into_request(COMMENTS_PAGE_SIZE)?;

    let comments = db::comment::get_comments_by_username(&pool, &username, page).await?;

    Ok(Json(comments))
}
