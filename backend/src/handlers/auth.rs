// src/handlers/auth.rs

use std::sync::Arc;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{Duration, Utc};
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::Config,
    db,
    error::AppError,
    models::user::{CreateUserRequest, LoginRequest, VerifyTokenRequest},
    utils::{
        jwt::{Claims, sign_jwt},
        mailer::Mailer,
    },
};

/// Registers a new user.
///
/// Returns 201 Created and the user object.
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    if db::user::get_user_by_email(&pool, &payload.email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }
    if db::user::get_user_by_username(&pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".to_string()));
    }

    let user = db::user::create_user(&pool, payload.into())
        .await
        .map_err(|e| match e {
            // Lost a race with another registration for the same name or email.
            AppError::Conflict(_) => {
                AppError::Conflict("Username or email already registered".to_string())
            }
            other => {
                tracing::error!("Failed to register user: {:?}", other);
                other
            }
        })?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Emails a magic token to the user named by username or email.
///
/// Refuses while the user still holds an unexpired token, so repeated
/// requests do not flood their inbox.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    State(mailer): State<Arc<dyn Mailer>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = db::user::get_user_by_email_or_username(&pool, payload.identifier.trim())
        .await?
        .ok_or(AppError::NotFound("User not found".to_string()))?;

    if db::token::has_active_token(&pool, user.id, Utc::now()).await? {
        return Err(AppError::Conflict(
            "You already have a non-expired token sent to your email".to_string(),
        ));
    }

    let token = db::token::create_magic_token(
        &pool,
        user.id,
        Duration::minutes(config.magic_token_ttl_minutes),
    )
    .await?;

    mailer
        .send_magic_token(&user.email, &token)
        .await
        .map_err(|e| {
            tracing::error!("Failed to deliver magic token: {:?}", e);
            e
        })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "message": "Magic token sent",
            "expires_at": token.expires_at,
        })),
    ))
}

/// Trades a magic token for a session token.
pub async fn verify(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<VerifyTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let token_id = Uuid::parse_str(payload.token.trim())
        .map_err(|_| AppError::BadRequest("Magic token must be a valid UUID".to_string()))?
        .to_string();

    let user_id = db::token::redeem_magic_token(&pool, &token_id, Utc::now())
        .await?
        .ok_or(AppError::AuthError("Invalid or expired token".to_string()))?;

    let user = db::user::get_user_by_id(&pool, user_id)
        .await?
        .ok_or(AppError::AuthError("User not found".to_string()))?;

    let token = sign_jwt(user.id, &config.jwt_secret, config.jwt_expiration)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "username": user.username,
    })))
}

/// Ends the login flow for the current user by dropping any pending tokens.
pub async fn logout(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id()?;

    db::token::delete_user_tokens(&pool, user_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
