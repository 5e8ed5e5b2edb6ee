//! Input commands accepted by the use cases.
//!
//! Commands carry raw caller input; trimming and validation happen when the
//! use case builds the [`crate::domain::entities::UrlRecord`].

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CreateUrlCommand {
    pub original_url: String,
    pub correlation_id: Option<String>,
    pub user_id: Option<Uuid>,
}

/// One entry of a batch request.
#[derive(Debug, Clone)]
pub struct BatchEntry {
    pub correlation_id: String,
    pub original_url: String,
}

/// Registers every entry or none. All entries are owned by `user_id`.
#[derive(Debug, Clone)]
pub struct CreateUrlBatchCommand {
    pub entries: Vec<BatchEntry>,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct GetUrlByHashCommand {
    pub hash: String,
}

#[derive(Debug, Clone, Copy)]
pub struct GetUrlsByUserIdCommand {
    pub user_id: Uuid,
}
