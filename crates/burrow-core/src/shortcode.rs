use crate::error::ShortenerError;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Number of random bytes behind every generated short code.
pub const CODE_BYTES: usize = 6;

/// Number of characters in a generated short code.
pub const CODE_LENGTH: usize = 8;

/// A short code identifying a stored URL.
///
/// Generated codes are the URL-safe base64 encoding of [`CODE_BYTES`] random
/// bytes, which is always exactly [`CODE_LENGTH`] characters and carries 48
/// bits of entropy. Lookup keys coming from outside may be wrapped with
/// [`ShortCode::new_unchecked`] and are not required to have that shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

impl ShortCode {
    /// Encodes raw bytes as a short code.
    ///
    /// # Examples
    ///
    /// ```
    /// use burrow_core::ShortCode;
    ///
    /// let code = ShortCode::from_bytes([0xff; 6]);
    /// assert_eq!(code.as_str(), "________");
    /// ```
    pub fn from_bytes(bytes: [u8; CODE_BYTES]) -> Self {
        Self(URL_SAFE.encode(bytes))
    }

    /// Creates a new `ShortCode` after validating its shape.
    ///
    /// Valid codes are exactly 8 characters of the URL-safe base64 alphabet
    /// and decode back to exactly 6 bytes.
    pub fn new(code: impl Into<String>) -> Result<Self, ShortenerError> {
        let code = Self(code.into());
        code.to_bytes()?;
        Ok(code)
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this for lookup keys supplied by callers; a malformed key simply
    /// never matches a stored record.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Decodes the code back into the bytes it was generated from.
    pub fn to_bytes(&self) -> Result<[u8; CODE_BYTES], ShortenerError> {
        let len = self.0.chars().count();
        if len != CODE_LENGTH {
            return Err(ShortenerError::InvalidShortCode(format!(
                "length must be {}, got {}",
                CODE_LENGTH, len
            )));
        }

        let decoded = URL_SAFE.decode(&self.0).map_err(|e| {
            ShortenerError::InvalidShortCode(format!("'{}' is not url-safe base64: {e}", self.0))
        })?;

        decoded.as_slice().try_into().map_err(|_| {
            ShortenerError::InvalidShortCode(format!(
                "'{}' decodes to {} bytes, expected {}",
                self.0,
                decoded.len(),
                CODE_BYTES
            ))
        })
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ShortCode {
    type Error = ShortenerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_bytes_are_eight_characters_and_decode_back() {
        let samples: [[u8; CODE_BYTES]; 5] = [
            [0; 6],
            [0xff; 6],
            [0xfb, 0xef, 0xbe, 0xfb, 0xef, 0xbe],
            [1, 2, 3, 4, 5, 6],
            [0x80, 0x00, 0x7f, 0x3e, 0x3f, 0x40],
        ];

        for bytes in samples {
            let code = ShortCode::from_bytes(bytes);
            assert_eq!(code.as_str().len(), CODE_LENGTH);
            assert_eq!(code.to_bytes().unwrap(), bytes);
        }
    }

    #[test]
    fn encoding_uses_url_safe_alphabet() {
        // 0xfb 0xef 0xbe maps to "++++" in the standard alphabet.
        let code = ShortCode::from_bytes([0xfb, 0xef, 0xbe, 0xff, 0xff, 0xff]);
        assert_eq!(code.as_str(), "----____");
        assert!(!code.as_str().contains('+'));
        assert!(!code.as_str().contains('/'));
    }

    #[test]
    fn valid_codes() {
        assert!(ShortCode::new("AAAAAAAA").is_ok());
        assert!(ShortCode::new("abc-12_Z").is_ok());
    }

    #[test]
    fn wrong_length() {
        assert!(ShortCode::new("").is_err());
        assert!(ShortCode::new("AAAAAAA").is_err());
        assert!(ShortCode::new("AAAAAAAAA").is_err());
    }

    #[test]
    fn invalid_characters() {
        assert!(ShortCode::new("abc+def/").is_err());
        assert!(ShortCode::new("abc def!").is_err());
        assert!(ShortCode::new("AAAAAA==").is_err());
    }

    #[test]
    fn unchecked_codes_skip_validation() {
        let code = ShortCode::new_unchecked("non-existing-short");
        assert_eq!(code.as_str(), "non-existing-short");
        assert!(code.to_bytes().is_err());
    }

    #[test]
    fn to_url_joins_base() {
        let code = ShortCode::new("abc123XY").unwrap();
        assert_eq!(code.to_url("https://burrow.link"), "https://burrow.link/abc123XY");
        assert_eq!(code.to_url("https://burrow.link/"), "https://burrow.link/abc123XY");
    }

    #[test]
    fn deserialize_validates_shape() {
        let code: ShortCode = serde_json::from_str("\"abc123XY\"").unwrap();
        assert_eq!(code.to_string(), "abc123XY");

        assert!(serde_json::from_str::<ShortCode>("\"short\"").is_err());
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"abc123XY\"");
    }
}
