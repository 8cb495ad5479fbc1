use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::pagination::{Cursor, Keyset};

/// A reply, as read from the 'comments' table.
///
/// `post_id` always names the post at the top of the thread, whatever the depth.
/// `parent_id` is `None` for a root comment that answers the post directly.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub content: String,
    pub owner_handle: String,
    pub post_id: i64,
    pub parent_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,

    /// Number of direct replies, counted at read time.
    pub comment_count: i64,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

impl Keyset for Comment {
    fn cursor(&self) -> Cursor {
        Cursor {
            created_at: self.created_at,
            id: self.id,
        }
    }
}

/// Fields supplied when inserting a comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub owner_handle: String,
    pub post_id: i64,
    pub parent_id: Option<i64>,
}

/// DTO for creating a new comment or reply.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(length(
        min = 1,
        max = 1500,
        message = "Comment must be between 1 and 1500 characters"
    ))]
    pub content: String,
}

/// Which comments a count covers. At most one filter applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentFilter {
    All,
    Owner(String),
    /// Every comment in the post's thread, at any depth.
    Post(i64),
    Parent(i64),
}

impl CommentFilter {
    /// Picks the filter with precedence owner, then post, then parent.
    pub fn from_options(owner: Option<String>, post_id: Option<i64>, parent_id: Option<i64>) -> Self {
        match (owner, post_id, parent_id) {
            (Some(owner), _, _) => CommentFilter::Owner(owner),
            (None, Some(post_id), _) => CommentFilter::Post(post_id),
            (None, None, Some(parent_id)) => CommentFilter::Parent(parent_id),
            (None, None, None) => CommentFilter::All,
        }
    }
}

/// Query parameters for counting comments.
#[derive(Debug, Default, Deserialize)]
pub struct CommentCountParams {
    pub owner: Option<String>,
    pub post_id: Option<i64>,
    pub parent_id: Option<i64>,
}

impl From<CommentCountParams> for CommentFilter {
    fn from(params: CommentCountParams) -> Self {
        CommentFilter::from_options(params.owner, params.post_id, params.parent_id)
    }
}
