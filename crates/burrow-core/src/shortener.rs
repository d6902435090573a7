use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Stores the given URL under a freshly generated short code and returns
    /// the code. Every call creates a new mapping, even for a URL that was
    /// shortened before.
    async fn shorten(&self, long_url: &str) -> Result<ShortCode>;

    /// Resolves a short code to the URL stored for it.
    /// Returns `Err(ShortenerError::NotFound)` if the code does not exist.
    async fn resolve(&self, code: &str) -> Result<String>;
}
