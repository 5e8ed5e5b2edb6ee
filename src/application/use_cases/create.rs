use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::{resolve_duplicate, with_deadline};
use crate::application::commands::CreateUrlCommand;
use crate::domain::UrlRegistry;
use crate::domain::entities::UrlRecord;
use crate::error::AppError;
use crate::utils::code_generator::HashGenerator;

/// Registers one URL under a freshly generated hash.
#[derive(Clone)]
pub struct CreateUrl {
    registry: Arc<UrlRegistry>,
    hasher: Arc<dyn HashGenerator>,
    timeout: Duration,
}

impl CreateUrl {
    pub fn new(registry: Arc<UrlRegistry>, hasher: Arc<dyn HashGenerator>, timeout: Duration) -> Self {
        Self {
            registry,
            hasher,
            timeout,
        }
    }

    /// Builds and registers the record.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for an empty or malformed URL
    /// - [`AppError::DuplicateEntry`] with `existing_hash` set when the URL is
    ///   already registered
    /// - [`AppError::DeadlineExceeded`] if the registry does not answer in time
    pub async fn execute(&self, cmd: CreateUrlCommand) -> Result<UrlRecord, AppError> {
        let record = UrlRecord::new(
            &cmd.original_url,
            &self.hasher.generate(),
            cmd.correlation_id,
            cmd.user_id,
        )?;

        with_deadline(self.timeout, async {
            match self.registry.create(&record).await {
                Ok(()) => Ok(()),
                Err(e) if e.is_duplicate() => {
                    metrics::counter!("urls_duplicate_total").increment(1);
                    Err(resolve_duplicate(&self.registry, e).await)
                }
                Err(e) => Err(e),
            }
        })
        .await?;

        metrics::counter!("urls_created_total").increment(1);
        debug!(hash = %record.hash, url = %record.original_url, "Registered URL");

        Ok(record)
    }
}
