//! Handler listing the caller's own URLs.

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::api::dto::user_urls::UserUrlResponse;
use crate::api::middleware::CurrentUser;
use crate::application::commands::GetUrlsByUserIdCommand;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the URLs created under the caller's identity.
///
/// # Endpoint
///
/// `GET /api/user/urls`
///
/// # Response Codes
///
/// - **200 OK**: `[{"short_url", "original_url"}]`
/// - **204 No Content**: the caller owns no URLs
/// - **401 Unauthorized**: the identity cookie did not verify
pub async fn user_urls_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Response, AppError> {
    let Some(user_id) = user.0 else {
        return Err(AppError::unauthorized("Unauthorized", json!({})));
    };

    let records = state
        .use_cases
        .get_by_user_id
        .execute(GetUrlsByUserIdCommand { user_id })
        .await?;

    if records.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let items: Vec<UserUrlResponse> = records
        .into_iter()
        .map(|record| UserUrlResponse {
            short_url: state.short_url(&record.hash),
            original_url: record.original_url,
        })
        .collect();

    Ok(Json(items).into_response())
}
