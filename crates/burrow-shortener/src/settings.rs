use typed_builder::TypedBuilder;

/// Default number of collision retries per shorten call.
pub const DEFAULT_EXISTS_RETRY: usize = 2;

/// Configures a [`ShortenerService`](crate::ShortenerService).
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ShortenerSettings {
    /// How many times a colliding short code is replaced with a fresh one
    /// before giving up. A shorten call makes at most `exists_retry + 1`
    /// insert attempts. Values below 1 are treated as 1.
    #[builder(default = DEFAULT_EXISTS_RETRY)]
    pub exists_retry: usize,
}

impl ShortenerSettings {
    /// The retry budget after coercing it to the minimum of 1.
    pub fn effective_exists_retry(&self) -> usize {
        self.exists_retry.max(1)
    }
}

impl Default for ShortenerSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
