//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Memory, JSON file and PostgreSQL storage backends

pub mod persistence;
