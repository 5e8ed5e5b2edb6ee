//! Utility functions for hash generation and URL processing.
//!
//! - [`code_generator`] - Short hash generation
//! - [`url_validator`] - Original URL syntax checks

pub mod code_generator;
pub mod url_validator;
