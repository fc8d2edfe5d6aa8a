// Document store for posts. Each post is one JSON document keyed by id.
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, OptionalExtension};
use thiserror::Error;

use crate::posts::model::{NewPost, Post};
use crate::state::DbPool;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Post {0} no longer exists")]
    Missing(String),
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// All posts, newest first. Posts with equal dates keep insertion order.
    async fn find_all(&self) -> Result<Vec<Post>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError>;

    /// Store a new post under a freshly generated id.
    async fn insert(&self, post: NewPost) -> Result<Post, StoreError>;

    /// Replace the whole stored document.
    ///
    /// This is a blind overwrite: there is no version check, so two callers
    /// that read the same post and then write it back will lose one of the
    /// updates.
    async fn update(&self, post: &Post) -> Result<Post, StoreError>;

    /// Returns false when nothing was stored under `id`.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;
}

pub struct SqlitePostStore {
    pool: DbPool,
}

impl SqlitePostStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Fixed-width UTC timestamp so lexical order in SQLite is chronological.
fn date_key(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn find_all(&self) -> Result<Vec<Post>, StoreError> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT document FROM posts ORDER BY date DESC, rowid ASC")?;
        let documents: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        documents
            .iter()
            .map(|json| serde_json::from_str(json).map_err(StoreError::from))
            .collect()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Post>, StoreError> {
        let conn = self.pool.get()?;

        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM posts WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match document {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn insert(&self, post: NewPost) -> Result<Post, StoreError> {
        let conn = self.pool.get()?;

        let post = post.into_post(uuid::Uuid::now_v7().to_string());
        let document = serde_json::to_string(&post)?;

        conn.execute(
            "INSERT INTO posts (id, user_id, date, document) VALUES (?1, ?2, ?3, ?4)",
            params![post.id, post.user, date_key(&post.date), document],
        )?;

        Ok(post)
    }

    async fn update(&self, post: &Post) -> Result<Post, StoreError> {
        let conn = self.pool.get()?;

        let document = serde_json::to_string(post)?;
        let rows = conn.execute(
            "UPDATE posts SET document = ?2, updated_at = datetime('now') WHERE id = ?1",
            params![post.id, document],
        )?;

        if rows == 0 {
            return Err(StoreError::Missing(post.id.clone()));
        }

        Ok(post.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let conn = self.pool.get()?;

        let rows = conn.execute("DELETE FROM posts WHERE id = ?1", params![id])?;

        Ok(rows > 0)
    }
}
