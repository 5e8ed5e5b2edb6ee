//! Storage contract shared by every URL backend.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::UrlRecord;
use crate::error::AppError;

/// Raw storage for URL records.
///
/// Implementations own concurrency control and durability for their medium and
/// must translate medium-specific failures into [`AppError`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryUrlStorage`] - process-local map
/// - [`crate::infrastructure::persistence::FileUrlStorage`] - JSON file, atomically rewritten
/// - [`crate::infrastructure::persistence::PgUrlStorage`] - PostgreSQL `urls` table
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStorage: Send + Sync {
    /// Persists one record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] if the original URL is already stored.
    /// Returns [`AppError::Internal`] on a hash or id collision, or on storage failure.
    async fn insert(&self, record: &UrlRecord) -> Result<(), AppError>;

    /// Persists every record or none of them.
    ///
    /// No partial batch is ever visible to a concurrent reader.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] if any original URL is already stored
    /// or repeats within the batch.
    /// Returns [`AppError::Internal`] on a hash or id collision, or on storage failure.
    async fn insert_batch(&self, records: &[UrlRecord]) -> Result<(), AppError>;

    /// Finds a record by its short hash.
    async fn find_by_hash(&self, hash: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by its original URL.
    async fn find_by_original_url(&self, original_url: &str)
    -> Result<Option<UrlRecord>, AppError>;

    /// Returns every record owned by `user_id`, in no particular order.
    async fn find_all_by_user_id(&self, user_id: Uuid) -> Result<Vec<UrlRecord>, AppError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), AppError>;
}
