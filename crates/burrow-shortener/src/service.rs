use crate::settings::ShortenerSettings;
use async_trait::async_trait;
use burrow_core::{Repository, ShortCode, Shortener, ShortenerError, UrlRecord};
use burrow_generator::Generator;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Result type for shortener operations.
pub type Result<T> = std::result::Result<T, ShortenerError>;

/// Longest accepted URL, in bytes, after trimming.
pub const MAX_URL_LENGTH: usize = 8 * 1024;

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL validation
/// - Short code generation
/// - Retrying with a fresh code when the repository reports a conflict
///
/// The service holds no mutable state. Correctness under concurrent calls
/// relies on the repository rejecting duplicate codes atomically.
#[derive(Debug, Clone)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
    exists_retry: usize,
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    /// Creates a new `ShortenerService`.
    pub fn new(repository: R, generator: G, settings: ShortenerSettings) -> Self {
        Self {
            repository: Arc::new(repository),
            generator: Arc::new(generator),
            exists_retry: settings.effective_exists_retry(),
        }
    }

    /// The collision retry budget in effect.
    pub fn exists_retry(&self) -> usize {
        self.exists_retry
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Looks up the full record stored for a short code.
    ///
    /// The key is trimmed but its shape is not checked: a key that could never
    /// have been generated simply isn't found.
    pub async fn lookup(&self, code: &str) -> Result<UrlRecord> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ShortenerError::NotFound(String::new()));
        }

        self.repository
            .get(&ShortCode::new_unchecked(code))
            .await
            .map_err(|err| {
                error!(code, error = %err, "failed to look up short code");
                ShortenerError::Storage(err)
            })?
            .ok_or_else(|| ShortenerError::NotFound(code.to_string()))
    }
}

/// Trims `long_url` and checks it is non-empty and at most
/// [`MAX_URL_LENGTH`] bytes long.
///
/// The shape of the URL itself is not checked.
pub fn validate_long_url(long_url: &str) -> Result<&str> {
    let long_url = long_url.trim();
    if long_url.is_empty() {
        return Err(ShortenerError::EmptyUrl);
    }

    let len = long_url.len();
    if len > MAX_URL_LENGTH {
        return Err(ShortenerError::TooLong {
            len,
            max: MAX_URL_LENGTH,
        });
    }

    Ok(long_url)
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, long_url: &str) -> Result<ShortCode> {
        let long_url = validate_long_url(long_url)?;

        let mut attempt = 0;
        loop {
            // Entropy failures abort the call; only conflicts are retried.
            let code = self.generator.generate()?;

            match self.repository.insert(&code, UrlRecord::new(long_url)).await {
                Ok(()) => {
                    debug!(code = %code, attempt, "stored short code");
                    return Ok(code);
                }
                Err(err) if err.is_conflict() => {
                    if attempt >= self.exists_retry {
                        warn!(
                            code = %code,
                            attempts = attempt + 1,
                            "short code collisions exhausted the retry budget"
                        );
                        return Err(ShortenerError::Exists(code.to_string()));
                    }
                    debug!(code = %code, attempt, "short code already exists, retrying");
                    attempt += 1;
                }
                Err(err) => {
                    error!(code = %code, attempt, error = %err, "failed to store short code");
                    return Err(ShortenerError::Storage(err));
                }
            }
        }
    }

    async fn resolve(&self, code: &str) -> Result<String> {
        self.lookup(code).await.map(|record| record.original_url)
    }
}
