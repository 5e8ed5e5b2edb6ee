use std::sync::Arc;
use std::time::Duration;

use super::with_deadline;
use crate::application::commands::GetUrlsByUserIdCommand;
use crate::domain::UrlRegistry;
use crate::domain::entities::UrlRecord;
use crate::error::AppError;

/// Lists every record owned by a user. An empty list is a valid answer.
#[derive(Clone)]
pub struct GetUrlsByUserId {
    registry: Arc<UrlRegistry>,
    timeout: Duration,
}

impl GetUrlsByUserId {
    pub fn new(registry: Arc<UrlRegistry>, timeout: Duration) -> Self {
        Self { registry, timeout }
    }

    pub async fn execute(&self, cmd: GetUrlsByUserIdCommand) -> Result<Vec<UrlRecord>, AppError> {
        with_deadline(self.timeout, self.registry.find_all_by_user_id(cmd.user_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::domain::repositories::UrlStorage;

    /// Storage that never answers user queries in time.
    struct SlowStorage;

    #[async_trait]
    impl UrlStorage for SlowStorage {
        async fn insert(&self, _: &UrlRecord) -> Result<(), AppError> {
            Ok(())
        }
        async fn insert_batch(&self, _: &[UrlRecord]) -> Result<(), AppError> {
            Ok(())
        }
        async fn find_by_hash(&self, _: &str) -> Result<Option<UrlRecord>, AppError> {
            Ok(None)
        }
        async fn find_by_original_url(&self, _: &str) -> Result<Option<UrlRecord>, AppError> {
            Ok(None)
        }
        async fn find_all_by_user_id(&self, _: Uuid) -> Result<Vec<UrlRecord>, AppError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Vec::new())
        }
        async fn ping(&self) -> Result<(), AppError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_slow_storage_hits_deadline() {
        let get = GetUrlsByUserId::new(
            Arc::new(UrlRegistry::new(Arc::new(SlowStorage))),
            Duration::from_millis(20),
        );

        let err = get
            .execute(GetUrlsByUserIdCommand {
                user_id: Uuid::new_v4(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DeadlineExceeded { .. }));
    }
}
