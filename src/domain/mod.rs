//! Domain layer containing business entities and rules.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Storage trait definitions
//! - [`registry`] - Domain rules (dedup, batch atomicity, ownership) over any storage
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Storage traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in use cases (see [`crate::application::use_cases`])

pub mod entities;
pub mod registry;
pub mod repositories;

pub use registry::UrlRegistry;
