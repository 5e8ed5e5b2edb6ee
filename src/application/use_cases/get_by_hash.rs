use std::sync::Arc;
use std::time::Duration;

use super::with_deadline;
use crate::application::commands::GetUrlByHashCommand;
use crate::domain::UrlRegistry;
use crate::domain::entities::UrlRecord;
use crate::error::AppError;

/// Resolves a short hash to its record.
#[derive(Clone)]
pub struct GetUrlByHash {
    registry: Arc<UrlRegistry>,
    timeout: Duration,
}

impl GetUrlByHash {
    pub fn new(registry: Arc<UrlRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown hash.
    pub async fn execute(&self, cmd: GetUrlByHashCommand) -> Result<UrlRecord, AppError> {
        with_deadline(self.timeout, self.registry.find_by_hash(cmd.hash.trim())).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUrlStorage;

    #[tokio::test]
    async fn test_trims_hash_before_lookup() {
        let mut storage = MockUrlStorage::new();
        storage
            .expect_find_by_hash()
            .withf(|hash| hash == "abcd1234")
            .times(1)
            .returning(|_| {
                Ok(Some(
                    UrlRecord::new("https://example.com", "abcd1234", None, None).unwrap(),
                ))
            });

        let get = GetUrlByHash::new(
            Arc::new(UrlRegistry::new(Arc::new(storage))),
            Duration::from_secs(1),
        );

        let record = get
            .execute(GetUrlByHashCommand {
                hash: " abcd1234 ".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(record.original_url, "https://example.com");
    }
}
