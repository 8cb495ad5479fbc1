// src/db/comment.rs

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::push_page;
use crate::{
    error::AppError,
    models::{
        comment::{Comment, CommentFilter, NewComment},
        pagination::{Page, PageRequest},
    },
};

/// Comment columns plus the live number of direct replies.
const SELECT_COMMENTS: &str = r#"
    SELECT
        c.id, c.content, c.owner_handle, c.post_id, c.parent_id,
        c.created_at, c.updated_at,
        (SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id) AS comment_count
    FROM comments c
    WHERE 1 = 1
"#;

/// Inserts a comment stamped with the current time.
pub async fn create_comment(pool: &SqlitePool, new: NewComment) -> Result<Comment, AppError> {
    create_comment_at(pool, new, Utc::now()).await
}

/// Inserts a comment with an explicit creation time.
///
/// The post must exist. A reply's parent must exist and sit under the same
/// post, so `post_id` always names the top of the thread.
pub async fn create_comment_at(
    pool: &SqlitePool,
    new: NewComment,
    created_at: DateTime<Utc>,
) -> Result<Comment, AppError> {
    let mut tx = pool.begin().await?;

    let post: Option<i64> = sqlx::query_scalar("SELECT id FROM posts WHERE id = ?")
        .bind(new.post_id)
        .fetch_optional(&mut *tx)
        .await?;
    if post.is_none() {
        return Err(AppError::NotFound("Post not found".to_string()));
    }

    if let Some(parent_id) = new.parent_id {
        let parent_post: Option<i64> =
            sqlx::query_scalar("SELECT post_id FROM comments WHERE id = ?")
                .bind(parent_id)
                .fetch_optional(&mut *tx)
                .await?;

        match parent_post {
            None => return Err(AppError::NotFound("Parent comment not found".to_string())),
            Some(post_id) if post_id != new.post_id => {
                return Err(AppError::BadRequest(
                    "Parent comment belongs to a different post".to_string(),
                ));
            }
            Some(_) => {}
        }
    }

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO comments (content, owner_handle, post_id, parent_id, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&new.content)
    .bind(&new.owner_handle)
    .bind(new.post_id)
    .bind(new.parent_id)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::debug!(
        comment_id = id,
        post_id = new.post_id,
        parent_id = ?new.parent_id,
        "comment created"
    );

    Ok(Comment {
        id,
        content: new.content,
        owner_handle: new.owner_handle,
        post_id: new.post_id,
        parent_id: new.parent_id,
        created_at,
        updated_at: created_at,
        comment_count: 0,
    })
}

/// Fetches one comment with its direct-reply count; `None` if it does not exist.
pub async fn get_comment(pool: &SqlitePool, id: i64) -> Result<Option<Comment>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_COMMENTS);
    qb.push(" AND c.id = ").push_bind(id);

    let comment = qb.build_query_as::<Comment>().fetch_optional(pool).await?;
    Ok(comment)
}

/// Direct replies to one comment.
pub async fn get_child_comments(
    pool: &SqlitePool,
    parent_id: i64,
    page: PageRequest,
) -> Result<Page<Comment>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_COMMENTS);
    qb.push(" AND c.parent_id = ").push_bind(parent_id);
    fetch_page(pool, qb, page).await
}

/// Root comments of one post; replies are reached through their parents.
pub async fn get_comments_by_post_id(
    pool: &SqlitePool,
    post_id: i64,
    page: PageRequest,
) -> Result<Page<Comment>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_COMMENTS);
    qb.push(" AND c.post_id = ")
        .push_bind(post_id)
        .push(" AND c.parent_id IS NULL");
    fetch_page(pool, qb, page).await
}

/// Every comment by one author, at any depth of any thread.
pub async fn get_comments_by_username(
    pool: &SqlitePool,
    owner_handle: &str,
    page: PageRequest,
) -> Result<Page<Comment>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_COMMENTS);
    qb.push(" AND c.owner_handle = ").push_bind(owner_handle);
    fetch_page(pool, qb, page).await
}

pub async fn get_total_comments_count(pool: &SqlitePool) -> Result<i64, AppError> {
    comments_count(pool, &CommentFilter::All).await
}

/// Number of comments matching one filter.
pub async fn comments_count(pool: &SqlitePool, filter: &CommentFilter) -> Result<i64, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM comments");
    match filter {
        CommentFilter::All => {}
        CommentFilter::Owner(owner) => {
            qb.push(" WHERE owner_handle = ").push_bind(owner.as_str());
        }
        CommentFilter::Post(post_id) => {
            qb.push(" WHERE post_id = ").push_bind(*post_id);
        }
        CommentFilter::Parent(parent_id) => {
            qb.push(" WHERE parent_id = ").push_bind(*parent_id);
        }
    }

    let count = qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(count)
}

async fn fetch_page(
    pool: &SqlitePool,
    mut qb: QueryBuilder<'_, Sqlite>,
    page: PageRequest,
) -> Result<Page<Comment>, AppError> {
    push_page(&mut qb, "c", &page);

    let comments = qb.build_query_as::<Comment>().fetch_all(pool).await?;
    Ok(Page::from_rows(comments, page.limit))
}
