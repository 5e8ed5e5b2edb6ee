//! HTTP server initialization and runtime setup.
//!
//! Builds the configured backend, then the registry and use cases, and runs
//! the Axum server until Ctrl+C / SIGTERM.

use crate::application::services::IdentitySigner;
use crate::config::{Config, StorageKind};
use crate::domain::repositories::UrlStorage;
use crate::infrastructure::persistence::{FileUrlStorage, MemoryUrlStorage, PgUrlStorage};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomHashGenerator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Opens the backend selected by `config`.
///
/// The relational backend is migrated before it is returned.
///
/// # Errors
///
/// Returns an error if the file cannot be loaded or the database is
/// unreachable or cannot be migrated.
pub async fn build_storage(config: &Config) -> Result<Arc<dyn UrlStorage>> {
    let storage: Arc<dyn UrlStorage> = match &config.storage {
        StorageKind::Memory => Arc::new(MemoryUrlStorage::new()),
        StorageKind::File(path) => Arc::new(
            FileUrlStorage::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?,
        ),
        StorageKind::Postgres(dsn) => {
            let storage = PgUrlStorage::connect(
                dsn,
                config.db_max_connections,
                Duration::from_secs(config.db_connect_timeout),
                Duration::from_secs(config.db_query_timeout),
            )
            .await
            .context("Failed to connect to database")?;
            tracing::info!("Connected to database");

            storage.migrate().await.context("Failed to migrate")?;
            Arc::new(storage)
        }
    };

    tracing::info!("Storage backend: {}", config.storage.name());
    Ok(storage)
}

/// Builds the shared state for `config` on top of `storage`.
pub fn build_state(config: &Config, storage: Arc<dyn UrlStorage>) -> AppState {
    AppState::new(
        storage,
        Arc::new(RandomHashGenerator::default()),
        IdentitySigner::new(config.cookie_secret.as_bytes()),
        &config.base_url,
        config.timeouts(),
    )
}

/// Runs the HTTP server with the given configuration.
///
/// # Errors
///
/// Returns an error if:
/// - The backend cannot be opened
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let storage = build_storage(&config).await?;
    let state = build_state(&config, storage);

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
