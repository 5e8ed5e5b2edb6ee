//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::application::commands::GetUrlByHashCommand;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short hash to its original URL.
///
/// # Endpoint
///
/// `GET /{hash}`
///
/// # Errors
///
/// Returns 404 Not Found if the hash is unknown.
pub async fn redirect_handler(
    Path(hash): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let record = state
        .use_cases
        .get_by_hash
        .execute(GetUrlByHashCommand { hash })
        .await?;

    Ok(Redirect::temporary(&record.original_url))
}
