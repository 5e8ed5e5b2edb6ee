#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use uuid::Uuid;
use url_registry::application::Timeouts;
use url_registry::application::services::IdentitySigner;
use url_registry::domain::entities::UrlRecord;
use url_registry::domain::repositories::UrlStorage;
use url_registry::infrastructure::persistence::MemoryUrlStorage;
use url_registry::routes::app_router;
use url_registry::state::AppState;
use url_registry::utils::code_generator::RandomHashGenerator;

pub const TEST_SECRET: &str = "test-cookie-secret";
pub const BASE_URL: &str = "http://localhost:8080";

pub fn record(url: &str, hash: &str) -> UrlRecord {
    UrlRecord::new(url, hash, None, None).unwrap()
}

pub fn owned_record(url: &str, hash: &str, user_id: Uuid) -> UrlRecord {
    UrlRecord::new(url, hash, None, Some(user_id)).unwrap()
}

pub fn signer() -> IdentitySigner {
    IdentitySigner::new(TEST_SECRET)
}

/// `Cookie` header value carrying a valid identity for `user_id`.
pub fn identity_cookie(user_id: Uuid) -> String {
    format!("user_id={}", signer().sign(&user_id.to_string()))
}

pub fn create_test_state(storage: Arc<dyn UrlStorage>) -> AppState {
    AppState::new(
        storage,
        Arc::new(RandomHashGenerator::default()),
        signer(),
        BASE_URL,
        Timeouts::default(),
    )
}

/// Full application over fresh in-memory storage.
pub fn create_test_server() -> (TestServer, Arc<MemoryUrlStorage>) {
    let storage = Arc::new(MemoryUrlStorage::new());
    let server = TestServer::new(app_router(create_test_state(storage.clone()))).unwrap();
    (server, storage)
}

/// Hash part of a short link returned by the API.
pub fn hash_of(short_url: &str) -> &str {
    short_url
        .strip_prefix(&format!("{BASE_URL}/"))
        .expect("short url carries the base url")
}
