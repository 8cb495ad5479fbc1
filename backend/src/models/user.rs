// src/models/user.rs

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").expect("username pattern is valid"));

/// Represents the 'users' table in the database.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: i64,

    /// Unique username, also used as the owner handle on posts and comments.
    pub username: String,

    /// Unique email; magic tokens are delivered here.
    pub email: String,

    pub first_name: String,
    pub last_name: String,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Fields written when creating or updating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    /// True when `details` would not change anything on this user.
    pub fn matches(&self, details: &NewUser) -> bool {
        self.username == details.username
            && self.email == details.email
            && self.first_name == details.first_name
            && self.last_name == details.last_name
    }
}

/// Account data for the current user.
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    #[serde(flatten)]
    pub user: User,
    pub posts_count: i64,
    pub comments_count: i64,
}

/// DTO for registration and for account updates.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(
        min = 2,
        max = 15,
        message = "First name must be between 2 and 15 characters."
    ))]
    pub first_name: String,

    #[validate(length(
        min = 2,
        max = 15,
        message = "Last name must be between 2 and 15 characters."
    ))]
    pub last_name: String,

    #[validate(
        length(min = 1, max = 20, message = "Username must be at most 20 characters."),
        custom(function = validate_username)
    )]
    pub username: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            username: req.username,
            email: req.email,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

/// DTO for requesting a magic token.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Either the username or the email address.
    #[validate(length(min = 1, max = 254, message = "Username or email is required"))]
    pub identifier: String,
}

/// DTO for trading a magic token for a session.
#[derive(Debug, Deserialize)]
pub struct VerifyTokenRequest {
    pub token: String,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(ValidationError::new("username")
            .with_message("Username must only contain letters and numbers".into()))
    }
}
