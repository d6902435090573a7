//! URL shortener service implementation.
//!
//! This crate wires a [`Repository`](burrow_core::Repository) and a
//! [`Generator`](burrow_generator::Generator) into the mapping service that
//! validates URLs, retries on short code collisions and resolves codes.

pub mod service;
pub mod settings;

pub use service::{validate_long_url, Result, ShortenerService, MAX_URL_LENGTH};
pub use settings::ShortenerSettings;
