//! HTTP middleware: user identity and request tracing.

pub mod identity;
pub mod tracing;

pub use identity::{CurrentUser, USER_ID_COOKIE};
