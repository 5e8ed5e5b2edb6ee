//! In-memory implementation of URL storage.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::url_index::UrlIndex;
use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlStorage;
use crate::error::AppError;

/// Process-local storage. Contents are lost on restart.
///
/// Reads take the shared lock, writes the exclusive one. Nothing is awaited
/// while a write is half applied, so cancelling a caller never leaves a
/// partial batch behind.
#[derive(Debug, Default)]
pub struct MemoryUrlStorage {
    index: RwLock<UrlIndex>,
}

impl MemoryUrlStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.index.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.index.read().await.is_empty()
    }
}

#[async_trait]
impl UrlStorage for MemoryUrlStorage {
    async fn insert(&self, record: &UrlRecord) -> Result<(), AppError> {
        self.index.write().await.try_insert(record.clone())
    }

    async fn insert_batch(&self, records: &[UrlRecord]) -> Result<(), AppError> {
        self.index.write().await.try_insert_batch(records)
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<UrlRecord>, AppError> {
        Ok(self.index.read().await.get_by_hash(hash).cloned())
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, AppError> {
        Ok(self
            .index
            .read()
            .await
            .get_by_original_url(original_url)
            .cloned())
    }

    async fn find_all_by_user_id(&self, user_id: Uuid) -> Result<Vec<UrlRecord>, AppError> {
        Ok(self.index.read().await.all_by_user(user_id))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
