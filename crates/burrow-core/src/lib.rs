//! Core types and traits for the Burrow URL shortener.
//!
//! This crate provides the short code value type, the repository contract
//! that storage backends implement, and the error taxonomy shared by the
//! generator, storage and shortener crates.

pub mod error;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use error::{GenerateError, ShortenerError, StorageError};
pub use repository::{ReadRepository, Repository, UrlRecord};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
