use serde::{Deserialize, Serialize};

/// One entry of `GET /api/user/urls`.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserUrlResponse {
    pub short_url: String,
    pub original_url: String,
}
