//! SQLite post store.
//!
//! Reads the CMS's own tables:
//! - `contents(cid, title, text, created, type, status)`, `created` in Unix seconds
//! - `fields(cid, name, str_value)` for custom fields
//!
//! Table names may carry the host's prefix (e.g. `typecho_contents`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;
use std::collections::HashMap;

use crate::error::{StoreError, StoreResult};
use crate::traits::PostStore;
use crate::types::{PostId, PostQuery, PostRecord};

/// Read-only view of a CMS SQLite database.
pub struct SqlitePostStore {
    pool: SqlitePool,
    table_prefix: String,
}

impl SqlitePostStore {
    /// Connect to the database at `database_url`.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite://./usr/site.db` - File-based database
    pub async fn new(database_url: &str) -> StoreResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(query_error)?;

        Ok(Self {
            pool,
            table_prefix: String::new(),
        })
    }

    /// Use tables named `<prefix>contents` and `<prefix>fields`.
    pub fn with_table_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.table_prefix = prefix.into();
        self
    }

    /// Create the tables this store reads. Used by tests and local setups.
    pub async fn create_schema(&self) -> StoreResult<()> {
        let statements = [
            format!(
                "CREATE TABLE IF NOT EXISTS {}contents (
                    cid INTEGER PRIMARY KEY,
                    title TEXT,
                    text TEXT,
                    created INTEGER NOT NULL DEFAULT 0,
                    type TEXT NOT NULL DEFAULT 'post',
                    status TEXT NOT NULL DEFAULT 'publish'
                )",
                self.table_prefix
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}fields (
                    cid INTEGER NOT NULL,
                    name TEXT NOT NULL,
                    str_value TEXT,
                    PRIMARY KEY (cid, name)
                )",
                self.table_prefix
            ),
        ];

        for statement in &statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(query_error)?;
        }

        Ok(())
    }

    /// Write a post and its custom fields. Used by tests and local setups.
    pub async fn insert_post(&self, record: &PostRecord) -> StoreResult<()> {
        let cid = i64::try_from(record.id.0).map_err(|_| StoreError::CorruptRow {
            cid: -1,
            reason: format!("post id {} does not fit in an INTEGER", record.id),
        })?;

        sqlx::query(&format!(
            "INSERT OR REPLACE INTO {}contents (cid, title, text, created, type, status) \
             VALUES (?, ?, ?, ?, ?, ?)",
            self.table_prefix
        ))
        .bind(cid)
        .bind(&record.title)
        .bind(&record.raw_body)
        .bind(record.created_at.timestamp())
        .bind(record.content_type.as_str())
        .bind(record.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        for (name, value) in &record.custom_fields {
            sqlx::query(&format!(
                "INSERT OR REPLACE INTO {}fields (cid, name, str_value) VALUES (?, ?, ?)",
                self.table_prefix
            ))
            .bind(cid)
            .bind(name)
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;
        }

        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[derive(Debug, FromRow)]
struct ContentRow {
    cid: i64,
    title: Option<String>,
    text: Option<String>,
    created: i64,
    #[sqlx(rename = "type")]
    content_type: String,
    status: String,
}

impl TryFrom<ContentRow> for PostRecord {
    type Error = StoreError;

    fn try_from(row: ContentRow) -> StoreResult<Self> {
        let id = u64::try_from(row.cid).map_err(|_| StoreError::CorruptRow {
            cid: row.cid,
            reason: "negative cid".to_string(),
        })?;
        let created_at =
            DateTime::<Utc>::from_timestamp(row.created, 0).ok_or_else(|| StoreError::CorruptRow {
                cid: row.cid,
                reason: format!("created {} is out of range", row.created),
            })?;

        Ok(PostRecord {
            id: PostId(id),
            title: row.title.unwrap_or_default(),
            raw_body: row.text.unwrap_or_default(),
            created_at,
            status: row.status.into(),
            content_type: row.content_type.into(),
            custom_fields: HashMap::new(),
        })
    }
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn find_latest(&self, query: &PostQuery) -> StoreResult<Option<PostRecord>> {
        let cid = match query.id.map(|id| i64::try_from(id.0)) {
            None => None,
            Some(Ok(cid)) => Some(cid),
            Some(Err(_)) => return Ok(None),
        };

        let sql = format!(
            "SELECT cid, title, text, created, type, status FROM {}contents \
             WHERE type = ? AND status = ? AND title = ?{} \
             ORDER BY created DESC LIMIT 1",
            self.table_prefix,
            if cid.is_some() { " AND cid = ?" } else { "" }
        );

        let mut select = sqlx::query_as::<_, ContentRow>(&sql)
            .bind(query.content_type.as_str())
            .bind(query.status.as_str())
            .bind(&query.title);
        if let Some(cid) = cid {
            select = select.bind(cid);
        }

        let row = select
            .fetch_optional(&self.pool)
            .await
            .map_err(query_error)?;

        row.map(PostRecord::try_from).transpose()
    }

    async fn custom_field(&self, id: PostId, name: &str) -> StoreResult<Option<String>> {
        let cid = match i64::try_from(id.0) {
            Ok(cid) => cid,
            Err(_) => return Ok(None),
        };

        let value: Option<(Option<String>,)> = sqlx::query_as(&format!(
            "SELECT str_value FROM {}fields WHERE cid = ? AND name = ?",
            self.table_prefix
        ))
        .bind(cid)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(value.and_then(|(v,)| v))
    }
}

fn query_error(e: sqlx::Error) -> StoreError {
    StoreError::Query(Box::new(e))
}
