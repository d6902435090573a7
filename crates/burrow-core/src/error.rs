use thiserror::Error;

/// Errors raised while drawing a new short code from an entropy source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("entropy source returned {got} bytes, expected {expected}")]
    ShortRead { expected: usize, got: usize },
    #[error("entropy source failed: {0}")]
    Entropy(String),
}

/// Errors reported by a [`Repository`](crate::Repository) implementation.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short code already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Returns `true` when the insert was rejected because the short code is
    /// already taken. This is the only storage condition the shortener retries.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StorageError::Conflict(_))
    }
}

/// Errors returned by the shortener service.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("empty strings are not allowed")]
    EmptyUrl,
    #[error("url is too long: {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },
    #[error("unable to create short code: {0}")]
    GenerateShort(#[source] GenerateError),
    #[error("short code already exists: {0}")]
    Exists(String),
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("invalid short code: {0}")]
    InvalidShortCode(String),
    #[error("database access error: {0}")]
    Storage(#[source] StorageError),
}

impl From<GenerateError> for ShortenerError {
    fn from(value: GenerateError) -> Self {
        Self::GenerateShort(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn only_conflict_is_classified_as_conflict() {
        assert!(StorageError::Conflict("AAAAAAAA".into()).is_conflict());
        assert!(!StorageError::Query("syntax error".into()).is_conflict());
        assert!(!StorageError::Unavailable("closed".into()).is_conflict());
    }

    #[test]
    fn storage_error_is_kept_as_source() {
        let err = ShortenerError::Storage(StorageError::Timeout("pool".into()));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "storage operation timed out: pool");
    }

    #[test]
    fn generate_error_converts_into_shortener_error() {
        let err: ShortenerError = GenerateError::ShortRead {
            expected: 6,
            got: 2,
        }
        .into();
        assert!(matches!(
            err,
            ShortenerError::GenerateShort(GenerateError::ShortRead { got: 2, .. })
        ));
    }
}
