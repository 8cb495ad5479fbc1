// src/db/post.rs

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::push_page;
use crate::{
    error::AppError,
    models::{
        pagination::{Page, PageRequest},
        post::{NewPost, Post},
    },
};

/// Post columns plus the live number of root comments.
const SELECT_POSTS: &str = r#"
    SELECT
        p.id, p.title, p.content, p.owner_handle, p.favorite,
        p.created_at, p.updated_at,
        (SELECT COUNT(*) FROM comments c
         WHERE c.post_id = p.id AND c.parent_id IS NULL) AS comment_count
    FROM posts p
    WHERE 1 = 1
"#;

/// Inserts a post stamped with the current time.
pub async fn create_post(pool: &SqlitePool, new: NewPost) -> Result<Post, AppError> {
    create_post_at(pool, new, Utc::now()).await
}

/// Inserts a post with an explicit creation time.
pub async fn create_post_at(
    pool: &SqlitePool,
    new: NewPost,
    created_at: DateTime<Utc>,
) -> Result<Post, AppError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO posts (title, content, owner_handle, favorite, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&new.title)
    .bind(&new.content)
    .bind(&new.owner_handle)
    .bind(new.favorite)
    .bind(created_at)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    tracing::debug!(post_id = id, owner = %new.owner_handle, "post created");

    Ok(Post {
        id,
        title: new.title,
        content: new.content,
        owner_handle: new.owner_handle,
        favorite: new.favorite,
        created_at,
        updated_at: created_at,
        comment_count: 0,
    })
}

/// Fetches one post with its root-comment count; `None` if it does not exist.
pub async fn get_post(pool: &SqlitePool, id: i64) -> Result<Option<Post>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_POSTS);
    qb.push(" AND p.id = ").push_bind(id);

    let post = qb.build_query_as::<Post>().fetch_optional(pool).await?;
    Ok(post)
}

/// Newest posts first.
pub async fn get_posts(pool: &SqlitePool, page: PageRequest) -> Result<Page<Post>, AppError> {
    list(pool, None, page).await
}

/// Newest posts of one author first.
pub async fn get_posts_by_username(
    pool: &SqlitePool,
    owner_handle: &str,
    page: PageRequest,
) -> Result<Page<Post>, AppError> {
    list(pool, Some(owner_handle), page).await
}

pub async fn get_total_posts_count(pool: &SqlitePool) -> Result<i64, AppError> {
    posts_count(pool, None).await
}

/// Number of posts, optionally restricted to one author.
pub async fn posts_count(pool: &SqlitePool, owner_handle: Option<&str>) -> Result<i64, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM posts");
    if let Some(owner) = owner_handle {
        qb.push(" WHERE owner_handle = ").push_bind(owner);
    }

    let count = qb.build_query_scalar::<i64>().fetch_one(pool).await?;
    Ok(count)
}

async fn list(
    pool: &SqlitePool,
    owner_handle: Option<&str>,
    page: PageRequest,
) -> Result<Page<Post>, AppError> {
    let mut qb = QueryBuilder::<Sqlite>::new(SELECT_POSTS);
    if let Some(owner) = owner_handle {
        qb.push(" AND p.owner_handle = ").push_bind(owner);
    }
    push_page(&mut qb, "p", &page);

    let posts = qb.build_query_as::<Post>().fetch_all(pool).await?;
    Ok(Page::from_rows(posts, page.limit))
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::db::{comment::create_comment, test_support};
    use crate::models::{comment::NewComment, pagination::Keyset};

    fn new_post(owner: &str, title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "C".to_string(),
            owner_handle: owner.to_string(),
            favorite: false,
        }
    }

    #[tokio::test]
    async fn missing_post_is_none() {
        let pool = test_support::pool().await;
        assert!(get_post(&pool, 404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn comment_count_only_counts_root_comments() {
        let pool = test_support::pool().await;
        let post = create_post(&pool, new_post("alice", "T")).await.unwrap();
        assert_eq!(get_post(&pool, post.id).await.unwrap().unwrap().comment_count, 0);

        let root = create_comment(
            &pool,
            NewComment {
                content: "hi".into(),
                owner_handle: "alice".into(),
                post_id: post.id,
                parent_id: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(get_post(&pool, post.id).await.unwrap().unwrap().comment_count, 1);

        create_comment(
            &pool,
            NewComment {
                content: "reply".into(),
                owner_handle: "bob".into(),
                post_id: post.id,
                parent_id: Some(root.id),
            },
        )
        .await
        .unwrap();
        let fetched = get_post(&pool, post.id).await.unwrap().unwrap();
        assert_eq!(fetched.comment_count, 1);
        assert_eq!(fetched.title, "T");
        assert_eq!(fetched.owner_handle, "alice");
    }

    #[tokio::test]
    async fn pages_by_username_until_exhausted() {
        let pool = test_support::pool().await;
        for title in ["one", "two", "three"] {
            create_post(&pool, new_post("alice", title)).await.unwrap();
        }
        create_post(&pool, new_post("bob", "other")).await.unwrap();

        let first = get_posts_by_username(&pool, "alice", PageRequest::first(2))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 2);
        let cursor = first.next_cursor.expect("full page has a cursor");

        let second = get_posts_by_username(&pool, "alice", PageRequest::after(cursor, 2))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 1);
        assert!(second.next_cursor.is_none());
        assert_eq!(second.items[0].title, "one");
    }

    #[tokio::test]
    async fn equal_timestamps_are_ordered_by_id_descending() {
        let pool = test_support::pool().await;
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let a = create_post_at(&pool, new_post("alice", "a"), at).await.unwrap();
        let b = create_post_at(&pool, new_post("alice", "b"), at).await.unwrap();
        let c = create_post_at(&pool, new_post("alice", "c"), at).await.unwrap();

        let page = get_posts(&pool, PageRequest::first(10)).await.unwrap();
        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);

        // A cursor sitting between two rows with the same timestamp.
        let rest = get_posts(&pool, PageRequest::after(page.items[0].cursor(), 10))
            .await
            .unwrap();
        let ids: Vec<i64> = rest.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[tokio::test]
    async fn following_cursors_visits_every_post_once() {
        let pool = test_support::pool().await;
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        for i in 0..11 {
            // Pairs share a timestamp so the tie-break is exercised across page edges.
            let at = base + Duration::seconds(i / 2);
            create_post_at(&pool, new_post("alice", &format!("p{i}")), at)
                .await
                .unwrap();
        }

        let everything = get_posts(&pool, PageRequest::first(1_000)).await.unwrap();
        assert_eq!(everything.items.len(), 11);

        let mut walked = Vec::new();
        let mut page = get_posts(&pool, PageRequest::first(3)).await.unwrap();
        loop {
            walked.extend(page.items.iter().map(|p| p.id));
            match page.next_cursor {
                Some(cursor) => {
                    page = get_posts(&pool, PageRequest::after(cursor, 3)).await.unwrap();
                }
                None => break,
            }
        }

        let expected: Vec<i64> = everything.items.iter().map(|p| p.id).collect();
        assert_eq!(walked, expected);
    }

    #[tokio::test]
    async fn counts_posts_in_total_and_per_owner() {
        let pool = test_support::pool().await;
        create_post(&pool, new_post("alice", "a")).await.unwrap();
        create_post(&pool, new_post("alice", "b")).await.unwrap();
        create_post(&pool, new_post("bob", "c")).await.unwrap();

        assert_eq!(get_total_posts_count(&pool).await.unwrap(), 3);
        assert_eq!(posts_count(&pool, Some("alice")).await.unwrap(), 2);
        assert_eq!(posts_count(&pool, Some("carol")).await.unwrap(), 0);
    }
}
