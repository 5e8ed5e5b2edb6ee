//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`UrlRecord`] - A short hash mapped to an original URL, optionally owned by a user

pub mod url;

pub use url::UrlRecord;
