//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization; request bodies are checked with
//! `validator` before they reach the use cases.

pub mod shorten;
pub mod user_urls;
