//! Shared error taxonomy for the registry and its callers.
//!
//! Every backend translates its own failures (driver errors, I/O errors,
//! serialization errors) into [`AppError`] before they leave the storage layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Unique constraint guarding `urls.original_url`.
pub const ORIGINAL_URL_CONSTRAINT: &str = "urls_original_url_key";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to HTTP clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The original URL is already registered.
    ///
    /// `existing_hash` is filled in by callers that re-query the registry for
    /// the pre-existing record.
    #[error("url already exists: {original_url}")]
    DuplicateEntry {
        original_url: String,
        existing_hash: Option<String>,
    },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    InvalidArgument { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    DeadlineExceeded { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn duplicate(original_url: impl Into<String>) -> Self {
        Self::DuplicateEntry {
            original_url: original_url.into(),
            existing_hash: None,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_argument(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn deadline_exceeded(message: impl Into<String>, details: Value) -> Self {
        Self::DeadlineExceeded {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true for [`AppError::DuplicateEntry`].
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::DuplicateEntry { .. })
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
            Self::DuplicateEntry { .. } => (StatusCode::CONFLICT, "duplicate_entry"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
            Self::InvalidArgument { .. } => (StatusCode::UNPROCESSABLE_ENTITY, "invalid_argument"),
            Self::Unauthorized { .. } => (StatusCode::UNAUTHORIZED, "unauthorized"),
            Self::DeadlineExceeded { .. } => (StatusCode::GATEWAY_TIMEOUT, "deadline_exceeded"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    /// Converts the error into its client-facing representation.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (_, code) = self.status_and_code();
        let details = match self {
            Self::DuplicateEntry {
                original_url,
                existing_hash,
            } => json!({ "original_url": original_url, "hash": existing_hash }),
            Self::Validation { details, .. }
            | Self::NotFound { details, .. }
            | Self::InvalidArgument { details, .. }
            | Self::Unauthorized { details, .. }
            | Self::DeadlineExceeded { details, .. }
            | Self::Internal { details, .. } => details.clone(),
        };

        ErrorInfo {
            code,
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal error");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

/// Translates a driver error into the shared taxonomy.
///
/// A unique violation on `original_url` is a domain duplicate; any other unique
/// violation (hash, primary key) is a collision the caller cannot recover from.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if matches!(e, sqlx::Error::PoolTimedOut) {
        return AppError::deadline_exceeded(
            "Timed out acquiring a database connection",
            json!({}),
        );
    }

    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        if db.constraint() == Some(ORIGINAL_URL_CONSTRAINT) {
            return AppError::duplicate(String::new());
        }
        return AppError::internal(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    AppError::internal("Database error", json!({ "reason": e.to_string() }))
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", json!({ "fields": e.to_string() }))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::internal("Storage I/O error", json!({ "reason": e.to_string() }))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::internal(
            "Storage serialization error",
            json!({ "reason": e.to_string() }),
        )
    }
}
