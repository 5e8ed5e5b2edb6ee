//! Top-level router.
//!
//! # Route Structure
//!
//! - `POST /`       - Shorten a plain-text URL
//! - `GET  /ping`   - Storage health probe
//! - `GET  /{hash}` - Short link redirect
//! - `/api/*`       - JSON API
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Identity** - Signed `user_id` cookie, issued on first contact

use axum::routing::{get, post};
use axum::{Router, middleware};

use crate::api;
use crate::api::handlers::{ping_handler, redirect_handler, shorten_text_handler};
use crate::api::middleware::{identity, tracing};
use crate::state::AppState;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(shorten_text_handler))
        .route("/ping", get(ping_handler))
        .route("/{hash}", get(redirect_handler))
        .nest("/api", api::routes::api_routes())
        .layer(middleware::from_fn_with_state(state.clone(), identity::layer))
        .with_state(state)
        .layer(tracing::layer())
}
