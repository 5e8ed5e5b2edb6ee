//! URL record entity: one mapping from a short hash to an original URL.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::utils::url_validator::validate_original_url;

/// A registered URL mapping.
///
/// Records are immutable once persisted. `updated_at` is kept for forward
/// compatibility; no current operation sets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub hash: String,
    pub original_url: String,
    #[serde(default)]
    pub correlation_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl UrlRecord {
    /// Builds a new record with a time-ordered id and the current timestamp.
    ///
    /// Both `original_url` and `hash` are trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - `original_url` is empty or not an absolute HTTP(S) URL
    /// - `hash` is empty
    pub fn new(
        original_url: &str,
        hash: &str,
        correlation_id: Option<String>,
        user_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        let original_url = original_url.trim();
        let hash = hash.trim();

        if original_url.is_empty() {
            return Err(AppError::bad_request("empty url", json!({})));
        }
        if hash.is_empty() {
            return Err(AppError::bad_request("empty hash", json!({})));
        }

        validate_original_url(original_url).map_err(|e| {
            AppError::bad_request(
                "Invalid URL format",
                json!({ "url": original_url, "reason": e.to_string() }),
            )
        })?;

        Ok(Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            updated_at: None,
            hash: hash.to_string(),
            original_url: original_url.to_string(),
            correlation_id,
            user_id,
        })
    }

    /// Returns true if the record belongs to `user_id`.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == Some(user_id)
    }
}
