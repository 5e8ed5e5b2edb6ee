//! Application layer: commands, use cases and stateless services.
//!
//! Use cases turn caller commands into [`crate::domain::UrlRegistry`] calls and
//! return registry errors unchanged, except that a duplicate is enriched with
//! the hash of the record that already holds the URL.

pub mod commands;
pub mod services;
pub mod use_cases;

pub use use_cases::{Timeouts, UrlUseCases};
