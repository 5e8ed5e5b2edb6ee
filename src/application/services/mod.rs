//! Stateless application services.

pub mod identity_signer;

pub use identity_signer::IdentitySigner;
