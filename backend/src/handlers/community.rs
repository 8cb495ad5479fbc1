use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use super::{POSTS_PAGE_SIZE, require_user};
use crate::{
    db,
    error::AppError,
    models::{
        pagination::PageParams,
        post::{CreatePostRequest, NewPost, PostCountParams},
    },
    utils::{html::clean_required, jwt::Claims},
};

/// Create a new post.
/// Requires: Login.
pub async fn create_post(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Validate payload
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let title = clean_required(&payload.title)
        .ok_or(AppError::BadRequest("Title is empty after sanitizing".to_string()))?;
    let content = clean_required(&payload.content)
        .ok_or(AppError::BadRequest("Content is empty after sanitizing".to_string()))?;

    // 2. Resolve the author
    let user = require_user(&pool, &claims).await?;

    // 3. Insert Post
    let post = db::post::create_post(
        &pool,
        NewPost {
            title,
            content,
            owner_handle: user.username,
            favorite: payload.favorite,
        },
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to create post: {:?}", e);
        e
    })?;

    Ok((StatusCode::CREATED, Json(json!({"id": post.id}))))
}

/// List posts (Recent first).
/// Supports cursor-based pagination.
pub async fn list_posts(
    State(pool): State<SqlitePool>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.into_request(POSTS_PAGE_SIZE)?;

    let posts = db::post::get_posts(&pool, page).await.map_err(|e| {
        tracing::error!("Failed to list posts: {:?}", e);
        e
    })?;

    Ok(Json(posts))
}

/// Get a single post by ID, with its root-comment count.
pub async fn get_post(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let post = db::post::get_post(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(post))
}

/// Count posts, optionally for one author.
pub async fn count_posts(
    State(pool): State<SqlitePool>,
    Query(params): Query<PostCountParams>,
) -> Result<impl IntoResponse, AppError> {
    let count = db::post::posts_count(&pool, params.owner.as_deref()).await?;

    Ok(Json(json!({ "count": count })))
}
