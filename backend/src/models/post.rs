use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::pagination::{Cursor, Keyset};

/// A journal entry, as read from the 'posts' table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,

    /// Username of the author, copied onto the row.
    pub owner_handle: String,
    pub favorite: bool,

    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,

    /// Number of root comments on this post, counted at read time.
    pub comment_count: i64,
}

impl Keyset for Post {
    fn cursor(&self) -> Cursor {
        Cursor {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// Fields supplied when inserting a post.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub owner_handle: String,
    pub favorite: bool,
}

/// DTO for creating a new post.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title length must be between 1 and 100 chars"
    ))]
    pub title: String,

    #[validate(length(
        min = 1,
        max = 10000,
        message = "Content length must be between 1 and 10000 chars"
    ))]
    pub content: String,

    #[serde(default)]
    pub favorite: bool,
}

/// Query parameters for counting posts.
#[derive(Debug, Default, Deserialize)]
pub struct PostCountParams {
    pub owner: Option<String>,
}
