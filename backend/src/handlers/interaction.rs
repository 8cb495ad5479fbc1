use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use super::{COMMENTS_PAGE_SIZE, require_user};
use crate::{
    db,
    error::AppError,
    models::{
        comment::{CommentCountParams, CommentFilter, CreateCommentRequest, NewComment},
        pagination::PageParams,
    },
    utils::{html::clean_required, jwt::Claims},
};

/// Create a root comment on a post.
pub async fn create_post_comment(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(post_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = validated_content(&payload)?;
    let user = require_user(&pool, &claims).await?;

    let comment = db::comment::create_comment(
        &pool,
        NewComment {
            content,
            owner_handle: user.username,
            post_id,
            parent_id: None,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": comment.id })),
    ))
}

/// Reply to a comment. The reply joins the parent's post.
pub async fn create_reply(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(parent_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let content = validated_content(&payload)?;
    let user = require_user(&pool, &claims).await?;

    let parent = db::comment::get_comment(&pool, parent_id)
        .await?
        .ok_or(AppError::NotFound("Comment not found".to_string()))?;

    let comment = db::comment::create_comment(
        &pool,
        NewComment {
            content,
            owner_handle: user.username,
            post_id: parent.post_id,
            parent_id: Some(parent.id),
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": comment.id })),
    ))
}

/// Root comments of a post, newest first.
pub async fn list_post_comments(
    State(pool): State<SqlitePool>,
    Path(post_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.into_request(COMMENTS_PAGE_SIZE)?;

    if db::post::get_post(&pool, post_id).await?.is_none() {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    let comments = db::comment::get_comments_by_post_id(&pool, post_id, page).await?;

    Ok(Json(comments))
}

/// Get a single comment by ID, with its direct-reply count.
pub async fn get_comment(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let comment = db::comment::get_comment(&pool, id)
        .await?
        .ok_or(AppError::NotFound("Comment not found".to_string()))?;

    Ok(Json(comment))
}

/// Direct replies to a comment, newest first.
pub async fn list_replies(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, AppError> {
    let page = params.into_request(COMMENTS_PAGE_SIZE)?;

    if db::comment::get_comment(&pool, id).await?.is_none() {
        return Err(AppError::NotFound("Comment not found".to_string()));
    }

    let replies = db::comment::get_child_comments(&pool, id, page).await?;

    Ok(Json(replies))
}

/// Count comments under one optional filter (owner, then post, then parent).
pub async fn count_comments(
    State(pool): State<SqlitePool>,
    Query(params): Query<CommentCountParams>,
) -> Result<impl IntoResponse, AppError> {
    let filter = CommentFilter::from(params);
    let count = db::comment::comments_count(&pool, &filter).await?;

    Ok(Json(json!({ "count": count })))
}

fn validated_content(payload: &CreateCommentRequest) -> Result<String, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    clean_required(&payload.content)
        .ok_or(AppError::BadRequest("Comment is empty after sanitizing".to_string()))
}
