//! DTOs for the shortening endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// `POST /api/shorten` body.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: String,

    #[serde(default)]
    pub correlation_id: Option<String>,
}

/// `POST /api/shorten` response, also sent with 409 for a known URL.
#[derive(Debug, Serialize, Deserialize)]
pub struct ShortenResponse {
    pub result: String,
}

/// One item of the `POST /api/shorten/batch` body.
#[derive(Debug, Deserialize, Validate)]
pub struct BatchItemRequest {
    #[validate(length(min = 1, message = "correlation_id must not be empty"))]
    pub correlation_id: String,

    #[validate(length(min = 1, message = "original_url must not be empty"))]
    pub original_url: String,
}

/// One item of the batch response, in request order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BatchItemResponse {
    pub correlation_id: String,
    pub short_url: String,
}
