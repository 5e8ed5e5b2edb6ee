//! PostgreSQL backend tests.
//!
//! Need a server reachable through `DATABASE_URL`:
//!
//! ```bash
//! cargo test --test repository_pg -- --ignored
//! ```

mod common;

use common::{owned_record, record};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use url_registry::domain::UrlRegistry;
use url_registry::domain::repositories::UrlStorage;
use url_registry::error::AppError;
use url_registry::infrastructure::persistence::PgUrlStorage;
use uuid::Uuid;

fn storage(pool: PgPool) -> PgUrlStorage {
    PgUrlStorage::new(Arc::new(pool), Duration::from_secs(5))
}

async fn count(pool: &PgPool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM urls")
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_insert_and_find(pool: PgPool) {
    let storage = storage(pool);
    let owner = Uuid::new_v4();
    let mut created = owned_record("https://example.com", "abcd1234", owner);
    created.correlation_id = Some("corr".to_string());

    storage.insert(&created).await.unwrap();

    let by_hash = storage.find_by_hash("abcd1234").await.unwrap().unwrap();
    assert_eq!(by_hash.id, created.id);
    assert_eq!(by_hash.original_url, "https://example.com");
    assert_eq!(by_hash.correlation_id.as_deref(), Some("corr"));
    assert_eq!(by_hash.user_id, Some(owner));
    assert!(by_hash.updated_at.is_none());

    let by_url = storage
        .find_by_original_url("https://example.com")
        .await
        .unwrap();
    assert!(by_url.is_some());
    assert!(
        storage
            .find_by_original_url("https://absent.com")
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_url_constraint_maps_to_duplicate(pool: PgPool) {
    let storage = storage(pool);

    storage
        .insert(&record("https://example.com", "first111"))
        .await
        .unwrap();
    let err = storage
        .insert(&record("https://example.com", "second22"))
        .await
        .unwrap_err();

    match err {
        AppError::DuplicateEntry { original_url, .. } => {
            assert_eq!(original_url, "https://example.com");
        }
        other => panic!("expected duplicate, got {other:?}"),
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_hash_constraint_maps_to_internal(pool: PgPool) {
    let storage = storage(pool);

    storage
        .insert(&record("https://a.com", "same1234"))
        .await
        .unwrap();
    let err = storage
        .insert(&record("https://b.com", "same1234"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Internal { .. }));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_batch_rolls_back_on_duplicate(pool: PgPool) {
    let registry = UrlRegistry::new(Arc::new(storage(pool.clone())));

    registry
        .create(&record("https://taken.com", "taken001"))
        .await
        .unwrap();

    let batch = vec![
        record("https://one.com", "batch001"),
        record("https://taken.com", "batch002"),
    ];
    let err = registry.create_batch(&batch).await.unwrap_err();

    assert!(err.is_duplicate());
    assert_eq!(count(&pool).await, 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_batch_commits_every_row(pool: PgPool) {
    let storage = storage(pool.clone());

    let batch: Vec<_> = (0..10)
        .map(|i| record(&format!("https://site{i}.com"), &format!("hash{i:04}")))
        .collect();
    storage.insert_batch(&batch).await.unwrap();

    assert_eq!(count(&pool).await, 10);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_find_all_by_user(pool: PgPool) {
    let registry = UrlRegistry::new(Arc::new(storage(pool)));
    let alice = Uuid::new_v4();

    registry
        .create(&owned_record("https://a.com", "alice001", alice))
        .await
        .unwrap();
    registry
        .create(&owned_record("https://b.com", "bob00001", Uuid::new_v4()))
        .await
        .unwrap();

    let records = registry.find_all_by_user_id(alice).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hash, "alice001");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore]
async fn test_ping(pool: PgPool) {
    assert!(storage(pool).ping().await.is_ok());
}
