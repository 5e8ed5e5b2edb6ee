mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use std::sync::Arc;
use url_registry::domain::entities::UrlRecord;
use url_registry::domain::repositories::UrlStorage;
use url_registry::error::AppError;
use url_registry::routes::app_router;
use uuid::Uuid;

/// Backend whose connection is gone.
struct UnreachableStorage;

#[async_trait]
impl UrlStorage for UnreachableStorage {
    async fn insert(&self, _: &UrlRecord) -> Result<(), AppError> {
        Err(AppError::internal("connection refused", json!({})))
    }
    async fn insert_batch(&self, _: &[UrlRecord]) -> Result<(), AppError> {
        Err(AppError::internal("connection refused", json!({})))
    }
    async fn find_by_hash(&self, _: &str) -> Result<Option<UrlRecord>, AppError> {
        Err(AppError::internal("connection refused", json!({})))
    }
    async fn find_by_original_url(&self, _: &str) -> Result<Option<UrlRecord>, AppError> {
        Err(AppError::internal("connection refused", json!({})))
    }
    async fn find_all_by_user_id(&self, _: Uuid) -> Result<Vec<UrlRecord>, AppError> {
        Err(AppError::internal("connection refused", json!({})))
    }
    async fn ping(&self) -> Result<(), AppError> {
        Err(AppError::deadline_exceeded("ping timed out", json!({})))
    }
}

#[tokio::test]
async fn test_ping_ok() {
    let (server, _) = common::create_test_server();

    let response = server.get("/ping").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_ping_failure_is_500() {
    let state = common::create_test_state(Arc::new(UnreachableStorage));
    let server = TestServer::new(app_router(state)).unwrap();

    let response = server.get("/ping").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_storage_failure_surfaces_as_500() {
    let state = common::create_test_state(Arc::new(UnreachableStorage));
    let server = TestServer::new(app_router(state)).unwrap();

    let response = server.get("/abcd1234").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "internal_error");
}
