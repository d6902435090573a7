//! Short code generation.
//!
//! A code is [`CODE_BYTES`] bytes drawn from an [`EntropySource`] and encoded
//! with the URL-safe base64 alphabet. All randomness comes from the source;
//! the encoding step is deterministic.

pub mod entropy;

pub use entropy::{CyclicEntropy, EntropySource, OsEntropy, ScriptedEntropy, SeededEntropy};

use burrow_core::shortcode::CODE_BYTES;
use burrow_core::{GenerateError, ShortCode};

/// Result type for code generation.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage, so
/// a generated code may already be taken. Callers are expected to handle the
/// resulting conflict on insert.
pub trait Generator: Send + Sync + 'static {
    /// Generates a new candidate short code.
    fn generate(&self) -> Result<ShortCode>;
}

/// Draws [`CODE_BYTES`] bytes from `source` and encodes them as a short code.
///
/// A source that returns fewer bytes than requested is treated as a failure,
/// it is not asked again.
pub fn generate_code<E: EntropySource + ?Sized>(source: &E) -> Result<ShortCode> {
    let mut bytes = [0u8; CODE_BYTES];
    let got = source.fill(&mut bytes)?;
    if got != CODE_BYTES {
        return Err(GenerateError::ShortRead {
            expected: CODE_BYTES,
            got,
        });
    }
    Ok(ShortCode::from_bytes(bytes))
}

/// A stateless random code generator backed by an entropy source.
#[derive(Debug, Clone, Default)]
pub struct RandomGenerator<E = OsEntropy> {
    source: E,
}

impl<E: EntropySource> RandomGenerator<E> {
    pub fn new(source: E) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &E {
        &self.source
    }
}

impl<E: EntropySource> Generator for RandomGenerator<E> {
    fn generate(&self) -> Result<ShortCode> {
        generate_code(&self.source).inspect_err(|err| {
            tracing::error!(error = %err, "failed to draw a short code");
        })
    }
}
