use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::debug;

use super::{resolve_duplicate, with_deadline};
use crate::application::commands::CreateUrlBatchCommand;
use crate::domain::UrlRegistry;
use crate::domain::entities::UrlRecord;
use crate::error::AppError;
use crate::utils::code_generator::HashGenerator;

/// Registers a batch of URLs atomically.
#[derive(Clone)]
pub struct CreateUrlBatch {
    registry: Arc<UrlRegistry>,
    hasher: Arc<dyn HashGenerator>,
    timeout: Duration,
}

impl CreateUrlBatch {
    pub fn new(registry: Arc<UrlRegistry>, hasher: Arc<dyn HashGenerator>, timeout: Duration) -> Self {
        Self {
            registry,
            hasher,
            timeout,
        }
    }

    /// Builds one record per entry and registers them all or none.
    ///
    /// The returned records are in the same order as `cmd.entries`, each
    /// carrying the `correlation_id` of its entry.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty batch or any invalid entry
    /// - [`AppError::DuplicateEntry`] if any URL is already registered or repeats
    ///   within the batch
    pub async fn execute(&self, cmd: CreateUrlBatchCommand) -> Result<Vec<UrlRecord>, AppError> {
        if cmd.entries.is_empty() {
            return Err(AppError::bad_request("empty batch", json!({})));
        }

        let records = cmd
            .entries
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                UrlRecord::new(
                    &entry.original_url,
                    &self.hasher.generate(),
                    Some(entry.correlation_id),
                    cmd.user_id,
                )
                .map_err(|e| with_position(e, position))
            })
            .collect::<Result<Vec<_>, _>>()?;

        with_deadline(self.timeout, async {
            match self.registry.create_batch(&records).await {
                Ok(()) => Ok(()),
                Err(e) if e.is_duplicate() => Err(resolve_duplicate(&self.registry, e).await),
                Err(e) => Err(e),
            }
        })
        .await?;

        metrics::counter!("url_batches_created_total").increment(1);
        metrics::counter!("urls_created_total").increment(records.len() as u64);
        debug!(count = records.len(), "Registered URL batch");

        Ok(records)
    }
}

fn with_position(err: AppError, position: usize) -> AppError {
    match err {
        AppError::Validation { message, details } => AppError::bad_request(
            message,
            json!({ "position": position, "details": details }),
        ),
        other => other,
    }
}
