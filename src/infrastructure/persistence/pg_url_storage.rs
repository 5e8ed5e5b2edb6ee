//! PostgreSQL implementation of URL storage.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, PgPoolOptions};
use sqlx::query::Query;
use uuid::Uuid;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlStorage;
use crate::error::AppError;

const INSERT_URL: &str = r#"
    INSERT INTO urls (id, created_at, updated_at, hash, original_url, correlation_id, user_id)
    VALUES ($1, $2, $3, $4, $5, $6, $7)
"#;

const FIND_BY_HASH: &str = r#"
    SELECT id, created_at, updated_at, hash, original_url, correlation_id, user_id
    FROM urls
    WHERE hash = $1
"#;

const FIND_BY_ORIGINAL_URL: &str = r#"
    SELECT id, created_at, updated_at, hash, original_url, correlation_id, user_id
    FROM urls
    WHERE original_url = $1
    LIMIT 1
"#;

const FIND_ALL_BY_USER_ID: &str = r#"
    SELECT id, created_at, updated_at, hash, original_url, correlation_id, user_id
    FROM urls
    WHERE user_id = $1
"#;

#[derive(Debug, sqlx::FromRow)]
struct UrlRow {
    id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    hash: String,
    original_url: String,
    correlation_id: Option<String>,
    user_id: Option<Uuid>,
}

impl From<UrlRow> for UrlRecord {
    fn from(row: UrlRow) -> Self {
        Self {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            hash: row.hash,
            original_url: row.original_url,
            correlation_id: row.correlation_id,
            user_id: row.user_id,
        }
    }
}

/// PostgreSQL storage for the `urls` table.
///
/// Uniqueness of `hash` and `original_url` is enforced by table constraints.
/// Every round trip is bounded by `query_timeout`; expiry surfaces as
/// [`AppError::DeadlineExceeded`] and drops the in-flight query.
pub struct PgUrlStorage {
    pool: Arc<PgPool>,
    query_timeout: Duration,
}

impl PgUrlStorage {
    /// Creates a new storage with a database connection pool.
    pub fn new(pool: Arc<PgPool>, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    /// Opens a connection pool and verifies it with a ping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DeadlineExceeded`] if no connection is acquired within
    /// `connect_timeout`, or [`AppError::Internal`] if the DSN is unusable.
    pub async fn connect(
        dsn: &str,
        max_connections: u32,
        connect_timeout: Duration,
        query_timeout: Duration,
    ) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(dsn)
            .await?;

        let storage = Self::new(Arc::new(pool), query_timeout);
        storage.ping().await?;
        Ok(storage)
    }

    /// Applies the bundled schema migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(self.pool.as_ref())
            .await
            .map_err(|e| AppError::internal("Migration failed", json!({ "reason": e.to_string() })))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs one database round trip under the query timeout.
    async fn bounded<T, F>(&self, fut: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, fut).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => Err(AppError::deadline_exceeded(
                "Database query timed out",
                json!({ "timeout_ms": self.query_timeout.as_millis() as u64 }),
            )),
        }
    }

    fn insert_query(record: &UrlRecord) -> Query<'_, sqlx::Postgres, PgArguments> {
        sqlx::query(INSERT_URL)
            .bind(record.id)
            .bind(record.created_at)
            .bind(record.updated_at)
            .bind(&record.hash)
            .bind(&record.original_url)
            .bind(&record.correlation_id)
            .bind(record.user_id)
    }
}

/// Attaches the offending URL to a duplicate reported by the constraint.
fn for_record(err: AppError, record: &UrlRecord) -> AppError {
    match err {
        AppError::DuplicateEntry { existing_hash, .. } => AppError::DuplicateEntry {
            original_url: record.original_url.clone(),
            existing_hash,
        },
        other => other,
    }
}

#[async_trait]
impl UrlStorage for PgUrlStorage {
    async fn insert(&self, record: &UrlRecord) -> Result<(), AppError> {
        self.bounded(Self::insert_query(record).execute(self.pool.as_ref()))
            .await
            .map(|_| ())
            .map_err(|e| for_record(e, record))
    }

    async fn insert_batch(&self, records: &[UrlRecord]) -> Result<(), AppError> {
        let mut tx = self.bounded(self.pool.begin()).await?;

        for record in records {
            let result = self
                .bounded(Self::insert_query(record).execute(&mut *tx))
                .await;

            if let Err(e) = result {
                // Dropping the transaction also rolls back; do it eagerly to
                // release the connection.
                let _ = self.bounded(tx.rollback()).await;
                return Err(for_record(e, record));
            }
        }

        self.bounded(tx.commit()).await
    }

    async fn find_by_hash(&self, hash: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, UrlRow>(FIND_BY_HASH)
                    .bind(hash)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, AppError> {
        let row = self
            .bounded(
                sqlx::query_as::<_, UrlRow>(FIND_BY_ORIGINAL_URL)
                    .bind(original_url)
                    .fetch_optional(self.pool.as_ref()),
            )
            .await?;

        Ok(row.map(UrlRecord::from))
    }

    async fn find_all_by_user_id(&self, user_id: Uuid) -> Result<Vec<UrlRecord>, AppError> {
        let rows = self
            .bounded(
                sqlx::query_as::<_, UrlRow>(FIND_ALL_BY_USER_ID)
                    .bind(user_id)
                    .fetch_all(self.pool.as_ref()),
            )
            .await?;

        Ok(rows.into_iter().map(UrlRecord::from).collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.bounded(sqlx::query("SELECT 1").execute(self.pool.as_ref()))
            .await
            .map(|_| ())
    }
}
