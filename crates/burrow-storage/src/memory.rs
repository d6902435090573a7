use async_trait::async_trait;
use burrow_core::error::StorageError;
use burrow_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use burrow_core::shortcode::ShortCode;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// In-memory implementation of the Repository trait using DashMap.
///
/// Inserts go through the entry API, which holds the shard lock between the
/// existence check and the write.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    storage: DashMap<String, UrlRecord>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: DashMap::with_capacity(capacity),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        Ok(self
            .storage
            .get(code.as_str())
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        match self.storage.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn code(s: &str) -> ShortCode {
        ShortCode::new_unchecked(s)
    }

    #[tokio::test]
    async fn save_and_get() {
        let repo = InMemoryRepository::new();
        let record = UrlRecord::new("https://example.com");

        repo.insert(&code("abc123XY"), record.clone()).await.unwrap();

        let result = repo.get(&code("abc123XY")).await.unwrap().unwrap();
        assert_eq!(result, record);
    }

    #[tokio::test]
    async fn get_nonexistent() {
        let repo = InMemoryRepository::new();

        let result = repo.get(&code("nope")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn insert_conflict_keeps_original_record() {
        let repo = InMemoryRepository::new();

        repo.insert(&code("abc123XY"), UrlRecord::new("https://example.com"))
            .await
            .unwrap();

        let err = repo
            .insert(&code("abc123XY"), UrlRecord::new("https://other.com"))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
        let result = repo.get(&code("abc123XY")).await.unwrap().unwrap();
        assert_eq!(result.original_url, "https://example.com");
    }

    #[tokio::test]
    async fn same_url_under_many_codes() {
        let repo = InMemoryRepository::with_capacity(4);

        for c in ["AAAAAAAA", "BBBBBBBB", "CCCCCCCC"] {
            repo.insert(&code(c), UrlRecord::new("https://example.com"))
                .await
                .unwrap();
        }

        assert_eq!(repo.len(), 3);
    }

    #[tokio::test]
    async fn concurrent_inserts_of_same_code_have_one_winner() {
        let repo = Arc::new(InMemoryRepository::new());
        let mut handles = vec![];

        for i in 0..16u64 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(
                    &code("samecode"),
                    UrlRecord::new(format!("https://example{}.com", i)),
                )
                .await
            }));
        }

        let mut wins = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => wins += 1,
                Err(err) if err.is_conflict() => conflicts += 1,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }

        assert_eq!(wins, 1);
        assert_eq!(conflicts, 15);
        assert_eq!(repo.len(), 1);
    }
}
