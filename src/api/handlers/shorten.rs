//! Handlers for the shortening endpoints.

use axum::{
    Extension, Json,
    extract::State,
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::shorten::{
    BatchItemRequest, BatchItemResponse, ShortenRequest, ShortenResponse,
};
use crate::api::middleware::CurrentUser;
use crate::application::commands::{BatchEntry, CreateUrlBatchCommand, CreateUrlCommand};
use crate::error::AppError;
use crate::state::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Shortens a URL sent as a plain-text body.
///
/// # Endpoint
///
/// `POST /`
///
/// # Response
///
/// - **201 Created**: the new short link as `text/plain`
/// - **409 Conflict**: the URL is already registered; body is its existing short link
pub async fn shorten_text_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    body: String,
) -> Result<Response, AppError> {
    let command = CreateUrlCommand {
        original_url: body,
        correlation_id: None,
        user_id: user.0,
    };

    let (status, short_url) = match state.use_cases.create.execute(command).await {
        Ok(record) => (StatusCode::CREATED, state.short_url(&record.hash)),
        Err(e) => (StatusCode::CONFLICT, existing_short_url(&state, e)?),
    };

    Ok((status, [(CONTENT_TYPE, TEXT_PLAIN)], short_url).into_response())
}

/// Shortens a URL sent as JSON.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com", "correlation_id": "optional" }
/// ```
///
/// # Response
///
/// `{"result": "<short url>"}` with **201 Created**, or with **409 Conflict**
/// carrying the existing short link.
pub async fn shorten_json_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let command = CreateUrlCommand {
        original_url: payload.url,
        correlation_id: payload.correlation_id,
        user_id: user.0,
    };

    let (status, result) = match state.use_cases.create.execute(command).await {
        Ok(record) => (StatusCode::CREATED, state.short_url(&record.hash)),
        Err(e) => (StatusCode::CONFLICT, existing_short_url(&state, e)?),
    };

    Ok((status, Json(ShortenResponse { result })))
}

/// Shortens a batch of URLs atomically.
///
/// # Endpoint
///
/// `POST /api/shorten/batch`
///
/// # Request Body
///
/// ```json
/// [{ "correlation_id": "1", "original_url": "https://example.com" }]
/// ```
///
/// # Response
///
/// **201 Created** with `[{"correlation_id", "short_url"}]` in request order.
///
/// # Errors
///
/// Returns 400 for an empty batch or an invalid item, 409 if any URL is
/// already registered. Nothing is stored on error.
pub async fn shorten_batch_handler(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<Vec<BatchItemRequest>>,
) -> Result<(StatusCode, Json<Vec<BatchItemResponse>>), AppError> {
    for item in &payload {
        item.validate()?;
    }

    let command = CreateUrlBatchCommand {
        entries: payload
            .into_iter()
            .map(|item| BatchEntry {
                correlation_id: item.correlation_id,
                original_url: item.original_url,
            })
            .collect(),
        user_id: user.0,
    };

    let records = state.use_cases.create_batch.execute(command).await?;

    let items = records
        .into_iter()
        .map(|record| BatchItemResponse {
            short_url: state.short_url(&record.hash),
            correlation_id: record.correlation_id.unwrap_or_default(),
        })
        .collect();

    Ok((StatusCode::CREATED, Json(items)))
}

/// Short link of the record that already holds the URL, or the original error.
fn existing_short_url(state: &AppState, err: AppError) -> Result<String, AppError> {
    match err {
        AppError::DuplicateEntry {
            existing_hash: Some(hash),
            ..
        } => Ok(state.short_url(&hash)),
        other => Err(other),
    }
}
