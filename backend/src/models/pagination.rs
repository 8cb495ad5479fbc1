// src/models/pagination.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Upper bound on the page size accepted from clients.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Position of the last row a client has seen.
///
/// Rows are ordered by `(created_at DESC, id DESC)`, so the pair is a total
/// order even when two rows share a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub created_at: DateTime<Utc>,
    pub id: i64,
}

/// A request for one page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Start strictly after this position; `None` starts at the newest row.
    pub cursor: Option<Cursor>,
    pub limit: i64,
}

impl PageRequest {
    pub fn first(limit: i64) -> Self {
        Self {
            cursor: None,
            limit,
        }
    }

    pub fn after(cursor: Cursor, limit: i64) -> Self {
        Self {
            cursor: Some(cursor),
            limit,
        }
    }
}

/// Rows that can be paged with a [`Cursor`].
pub trait Keyset {
    fn cursor(&self) -> Cursor;
}

/// One page of results plus the cursor for the next one.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` once a page comes back short, meaning there is nothing after it.
    pub next_cursor: Option<Cursor>,
}

impl<T: Keyset> Page<T> {
    pub fn from_rows(items: Vec<T>, limit: i64) -> Self {
        let full = limit > 0 && items.len() as i64 == limit;
        let next_cursor = if full {
            items.last().map(Keyset::cursor)
        } else {
            None
        };

        Self { items, next_cursor }
    }
}

/// Query parameters for listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    /// JSON-encoded [`Cursor`] taken from a previous page's `next_cursor`.
    pub cursor: Option<String>,

    /// Number of items to return (capped at [`MAX_PAGE_SIZE`]).
    pub limit: Option<i64>,
}

impl PageParams {
    pub fn into_request(self, default_limit: i64) -> Result<PageRequest, AppError> {
        let cursor = match self.cursor.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(serde_json::from_str::<Cursor>(raw)?),
            _ => None,
        };
        let limit = self.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);

        Ok(PageRequest { cursor, limit })
    }
}
