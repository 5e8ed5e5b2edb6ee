//! API route configuration.

use axum::{
    Router,
    routing::{get, post},
};

use crate::api::handlers::{shorten_batch_handler, shorten_json_handler, user_urls_handler};
use crate::state::AppState;

/// JSON API routes, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /shorten`       - Shorten one URL
/// - `POST /shorten/batch` - Shorten a batch of URLs atomically
/// - `GET  /user/urls`     - URLs owned by the caller
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_json_handler))
        .route("/shorten/batch", post(shorten_batch_handler))
        .route("/user/urls", get(user_urls_handler))
}
