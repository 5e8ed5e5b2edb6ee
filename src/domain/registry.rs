//! URL registry: domain rules on top of a storage backend.
//!
//! The registry enforces dedup by original URL, batch atomicity and ownership
//! filtering the same way whichever [`UrlStorage`] is plugged in. It never logs;
//! every failure is returned to the caller as an [`AppError`].

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlStorage;
use crate::error::AppError;

pub struct UrlRegistry {
    storage: Arc<dyn UrlStorage>,
}

impl UrlRegistry {
    pub fn new(storage: Arc<dyn UrlStorage>) -> Self {
        Self { storage }
    }

    /// Registers a single record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] if the original URL is already
    /// registered. Callers look the existing record up with
    /// [`Self::find_by_original_url`] to surface its hash.
    ///
    /// Returns [`AppError::Internal`] on hash/id collision or storage failure.
    pub async fn create(&self, record: &UrlRecord) -> Result<(), AppError> {
        if self
            .storage
            .find_by_original_url(&record.original_url)
            .await?
            .is_some()
        {
            return Err(AppError::duplicate(&record.original_url));
        }

        self.storage
            .insert(record)
            .await
            .map_err(|e| with_original_url(e, &record.original_url))
    }

    /// Registers every record of the batch, or none of them.
    ///
    /// Dedup applies per item: an original URL that is already registered, or
    /// that appears twice in the batch, rejects the whole batch.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateEntry`] for a repeated or pre-existing URL.
    /// Returns [`AppError::Internal`] for a repeated hash or storage failure.
    pub async fn create_batch(&self, records: &[UrlRecord]) -> Result<(), AppError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut hashes = HashSet::with_capacity(records.len());
        let mut urls = HashSet::with_capacity(records.len());

        for record in records {
            if !hashes.insert(record.hash.as_str()) {
                return Err(AppError::internal(
                    "Duplicate hash in batch",
                    json!({ "hash": record.hash }),
                ));
            }
            if !urls.insert(record.original_url.as_str()) {
                return Err(AppError::duplicate(&record.original_url));
            }
        }

        self.storage.insert_batch(records).await
    }

    /// Finds a record by its short hash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record has this hash.
    pub async fn find_by_hash(&self, hash: &str) -> Result<UrlRecord, AppError> {
        self.storage
            .find_by_hash(hash)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "hash": hash })))
    }

    /// Looks up a record by original URL.
    ///
    /// Absence is `Ok(None)`, not an error.
    pub async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, AppError> {
        self.storage.find_by_original_url(original_url).await
    }

    /// Returns all records owned by `user_id`. An empty result is not an error.
    pub async fn find_all_by_user_id(&self, user_id: Uuid) -> Result<Vec<UrlRecord>, AppError> {
        let records = self.storage.find_all_by_user_id(user_id).await?;

        Ok(records
            .into_iter()
            .filter(|record| record.is_owned_by(user_id))
            .collect())
    }

    /// Checks that the underlying backend is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.storage.ping().await
    }
}

/// Backends may not know the URL that tripped a unique constraint.
fn with_original_url(err: AppError, original_url: &str) -> AppError {
    match err {
        AppError::DuplicateEntry { existing_hash, .. } => AppError::DuplicateEntry {
            original_url: original_url.to_string(),
            existing_hash,
        },
        other => other,
    }
}
