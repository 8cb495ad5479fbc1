// src/db/mod.rs

//! Data access for users, magic tokens, posts and comments.
//!
//! Every listing pages with the same keyset protocol: rows come back ordered
//! by `(created_at DESC, id DESC)` and a page starts strictly after the
//! cursor's position. Reply counts are never stored; they are counted from
//! the child rows in the same query that reads the parent.

use std::{str::FromStr, time::Duration};

use sqlx::{
    QueryBuilder, Sqlite, SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::models::pagination::PageRequest;

pub mod comment;
pub mod post;
pub mod token;
pub mod user;

/// Opens a connection pool for `database_url`, creating the file if needed.
///
/// SQLite allows a single writer, so the pool holds one connection. An
/// in-memory database lives exactly as long as that connection, so it is
/// never reaped.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

    let mut options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));
    if !in_memory {
        options = options.journal_mode(SqliteJournalMode::Wal);
    }

    SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Applies the embedded schema migrations.
pub async fn migrate(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Appends the cursor predicate, ordering and limit to a query whose WHERE
/// clause is already open. `alias` is the table alias of the paged rows.
pub(crate) fn push_page(qb: &mut QueryBuilder<'_, Sqlite>, alias: &str, page: &PageRequest) {
    if let Some(cursor) = page.cursor {
        qb.push(" AND (")
            .push(alias)
            .push(".created_at < ")
            .push_bind(cursor.created_at)
            .push(" OR (")
            .push(alias)
            .push(".created_at = ")
            .push_bind(cursor.created_at)
            .push(" AND ")
            .push(alias)
            .push(".id < ")
            .push_bind(cursor.id)
            .push("))");
    }

    qb.push(" ORDER BY ")
        .push(alias)
        .push(".created_at DESC, ")
        .push(alias)
        .push(".id DESC LIMIT ")
        .push_bind(page.limit.max(0));
}
