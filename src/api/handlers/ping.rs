//! Handler for the storage health probe.

use axum::extract::State;
use serde_json::json;
use tracing::warn;

use crate::error::AppError;
use crate::state::AppState;

/// Checks that the configured backend is reachable.
///
/// # Endpoint
///
/// `GET /ping`
///
/// Returns **200 OK** when healthy and **500** otherwise, whatever the
/// underlying failure.
pub async fn ping_handler(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.registry.ping().await.map_err(|e| {
        warn!(error = %e, "Storage ping failed");
        AppError::internal("Storage unavailable", json!({ "reason": e.to_string() }))
    })?;

    Ok("OK")
}
