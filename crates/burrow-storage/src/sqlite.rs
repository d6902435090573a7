use async_trait::async_trait;
use burrow_core::error::StorageError;
use burrow_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use burrow_core::shortcode::ShortCode;
use jiff::Timestamp;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

/// Static schema applied when a repository is opened.
pub const SCHEMA: &str = include_str!("../ddl/sqlite/short_urls.sql");

/// Column the uniqueness constraint lives on, as SQLite names it in errors.
const CODE_COLUMN: &str = "short_urls.short_code";

/// SQLite implementation of the repository contract.
///
/// The `short_code` column carries a `UNIQUE` constraint, so the check and
/// the write of an insert happen in one statement.
#[derive(Debug, Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Creates a repository from an existing pool and makes sure the schema
    /// exists.
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(SCHEMA)
            .execute(&pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self { pool })
    }

    /// Opens (creating if needed) an on-disk database.
    ///
    /// In-memory paths are rejected; use [`SqliteRepository::in_memory`].
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.to_string_lossy().contains(":memory:") {
            return Err(StorageError::Operation(
                "in-memory databases must be opened with SqliteRepository::in_memory".to_string(),
            ));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;

        tracing::debug!(path = %path.display(), "opened sqlite repository");
        Self::new(pool).await
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every SQLite in-memory connection is its own database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:").map_err(map_sqlx_error)?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(map_sqlx_error)?;
        Self::new(pool).await
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn parse_created_at(seconds: i64) -> Result<Timestamp> {
    Timestamp::from_second(seconds).map_err(|e| {
        StorageError::InvalidData(format!("invalid created_at timestamp '{}': {e}", seconds))
    })
}

/// Reports whether `err` is a uniqueness violation on the short code column.
///
/// Unique violations on any other column are ordinary query failures.
fn is_code_conflict(err: &sqlx::Error) -> bool {
    let Some(db_err) = err.as_database_error() else {
        return false;
    };

    db_err.is_unique_violation() && db_err.message().contains(CODE_COLUMN)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Configuration(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for SqliteRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT original_url, created_at
            FROM short_urls
            WHERE short_code = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
        let created_at_raw: i64 = row.try_get("created_at").map_err(map_sqlx_error)?;
        let created_at = parse_created_at(created_at_raw)?;

        Ok(Some(UrlRecord {
            original_url,
            created_at,
        }))
    }
}

#[async_trait]
impl Repository for SqliteRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_code, original_url, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(code.as_str())
        .bind(record.original_url)
        .bind(record.created_at.as_second())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_code_conflict(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }
}
