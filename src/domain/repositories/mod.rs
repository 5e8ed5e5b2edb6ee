//! Repository trait definitions for the domain layer.
//!
//! The traits here are the contracts implemented by concrete backends in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UrlStorage`] - URL record storage

pub mod url_storage;

pub use url_storage::UrlStorage;

#[cfg(test)]
pub use url_storage::MockUrlStorage;
