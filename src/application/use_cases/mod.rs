//! Use cases: one registry call each, bounded by a deadline.

pub mod create;
pub mod create_batch;
pub mod get_by_hash;
pub mod get_by_user_id;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use crate::domain::UrlRegistry;
use crate::error::AppError;
use crate::utils::code_generator::HashGenerator;

pub use create::CreateUrl;
pub use create_batch::CreateUrlBatch;
pub use get_by_hash::GetUrlByHash;
pub use get_by_user_id::GetUrlsByUserId;

/// Deadlines applied to registry calls.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub read: Duration,
    pub write: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            read: Duration::from_secs(10),
            write: Duration::from_secs(30),
        }
    }
}

/// Runs `fut` under `timeout`. Expiry drops the future and reports
/// [`AppError::DeadlineExceeded`].
pub(crate) async fn with_deadline<T, F>(timeout: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    tokio::time::timeout(timeout, fut).await.unwrap_or_else(|_| {
        Err(AppError::deadline_exceeded(
            "Operation deadline exceeded",
            json!({ "timeout_ms": timeout.as_millis() as u64 }),
        ))
    })
}

/// Looks up the record that caused a duplicate and attaches its hash.
///
/// A duplicate with no stored counterpart (a URL repeated inside one batch)
/// is returned as-is, without an existing hash.
pub(crate) async fn resolve_duplicate(registry: &UrlRegistry, err: AppError) -> AppError {
    let AppError::DuplicateEntry { original_url, .. } = err else {
        return err;
    };

    match registry.find_by_original_url(&original_url).await {
        Ok(Some(existing)) => AppError::DuplicateEntry {
            original_url,
            existing_hash: Some(existing.hash),
        },
        Ok(None) => AppError::DuplicateEntry {
            original_url,
            existing_hash: None,
        },
        Err(e) => e,
    }
}

/// All use cases wired against one registry.
#[derive(Clone)]
pub struct UrlUseCases {
    pub create: CreateUrl,
    pub create_batch: CreateUrlBatch,
    pub get_by_hash: GetUrlByHash,
    pub get_by_user_id: GetUrlsByUserId,
}

impl UrlUseCases {
    pub fn new(
        registry: Arc<UrlRegistry>,
        hasher: Arc<dyn HashGenerator>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            create: CreateUrl::new(registry.clone(), hasher.clone(), timeouts.write),
            create_batch: CreateUrlBatch::new(registry.clone(), hasher, timeouts.write),
            get_by_hash: GetUrlByHash::new(registry.clone(), timeouts.read),
            get_by_user_id: GetUrlsByUserId::new(registry, timeouts.read),
        }
    }
}
