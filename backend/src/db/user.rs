// src/db/user.rs

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{NewUser, User},
};

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, created_at, updated_at";

/// Inserts a user.
///
/// There is no pre-check: a taken username or email fails on the unique
/// constraint and comes back as `AppError::Conflict`.
pub async fn create_user(pool: &SqlitePool, new: NewUser) -> Result<User, AppError> {
    create_user_at(pool, new, Utc::now()).await
}

pub async fn create_user_at(
    pool: &SqlitePool,
    new: NewUser,
    created_at: DateTime<Utc>,
) -> Result<User, AppError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO users (username, email, first_name, last_name, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    Ok(User {
        id,
        username: new.username,
        email: new.email,
        first_name: new.first_name,
        last_name: new.last_name,
        created_at,
        updated_at: created_at,
    })
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Looks a user up by whichever of email or username `identifier` matches.
pub async fn get_user_by_email_or_username(
    pool: &SqlitePool,
    identifier: &str,
) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ?1 OR username = ?1 LIMIT 1"
    ))
    .bind(identifier)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

/// Replaces a user's details; `None` if the user does not exist.
///
/// Posts and comments carry the author's username as their owner handle, so a
/// rename rewrites those handles in the same transaction.
pub async fn update_user(
    pool: &SqlitePool,
    id: i64,
    changes: NewUser,
) -> Result<Option<User>, AppError> {
    let mut tx = pool.begin().await?;

    let select = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
    let Some(current) = sqlx::query_as::<_, User>(&select)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(None);
    };

    let updated_at = Utc::now();
    sqlx::query(
        r#"
        UPDATE users
        SET username = ?, email = ?, first_name = ?, last_name = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&changes.username)
    .bind(&changes.email)
    .bind(&changes.first_name)
    .bind(&changes.last_name)
    .bind(updated_at)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if current.username != changes.username {
        for table in ["posts", "comments"] {
            let moved = sqlx::query(&format!(
                "UPDATE {table} SET owner_handle = ? WHERE owner_handle = ?"
            ))
            .bind(&changes.username)
            .bind(&current.username)
            .execute(&mut *tx)
            .await?
            .rows_affected();
            tracing::debug!(table, moved, "owner handle renamed");
        }
    }

    tx.commit().await?;

    Ok(Some(User {
        id,
        username: changes.username,
        email: changes.email,
        first_name: changes.first_name,
        last_name: changes.last_name,
        created_at: current.created_at,
        updated_at,
    }))
}
