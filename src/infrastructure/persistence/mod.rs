//! URL storage backends.
//!
//! Concrete implementations of [`crate::domain::repositories::UrlStorage`].
//!
//! # Backends
//!
//! - [`MemoryUrlStorage`] - process-local map with hash/URL/user indexes
//! - [`FileUrlStorage`] - same structure, persisted to a JSON file on every mutation
//! - [`PgUrlStorage`] - PostgreSQL `urls` table with unique constraints

pub mod file_url_storage;
pub mod memory_url_storage;
pub mod pg_url_storage;
pub mod url_index;

pub use file_url_storage::FileUrlStorage;
pub use memory_url_storage::MemoryUrlStorage;
pub use pg_url_storage::PgUrlStorage;
pub use url_index::UrlIndex;
