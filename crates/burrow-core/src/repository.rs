use crate::error::StorageError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A stored URL record in the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// The original URL that was shortened, exactly as it was stored.
    pub original_url: String,
    /// When the mapping was created.
    pub created_at: Timestamp,
}

impl UrlRecord {
    /// Creates a record stamped with the current time.
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            created_at: Timestamp::now(),
        }
    }
}

/// A read-only view of a repository.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the URL record for a given short code.
    /// Returns `None` if the code does not exist.
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;
}

/// The persistence contract the shortener depends on.
///
/// The short code is the unique key; the same original URL may be stored
/// under any number of codes. Records are immutable once inserted.
#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new URL record.
    ///
    /// The uniqueness check and the write must be a single atomic step: when
    /// several callers insert the same code concurrently exactly one succeeds
    /// and every other caller gets `Err(StorageError::Conflict)`. An existing
    /// record is never overwritten.
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()>;
}
