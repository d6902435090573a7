//! Storage backends for the Burrow URL shortener.
//!
//! Both backends enforce uniqueness of the short code at the store itself,
//! so concurrent inserts of the same code resolve to one success and
//! [`StorageError::Conflict`] for everyone else.

pub mod memory;
pub mod sqlite;

pub use burrow_core::repository::{ReadRepository, Repository, Result, UrlRecord};
pub use burrow_core::StorageError;
pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;
