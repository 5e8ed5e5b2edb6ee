//! Shared state handed to every HTTP handler.

use std::sync::Arc;

use crate::application::services::IdentitySigner;
use crate::application::{Timeouts, UrlUseCases};
use crate::domain::UrlRegistry;
use crate::domain::repositories::UrlStorage;
use crate::utils::code_generator::HashGenerator;

#[derive(Clone)]
pub struct AppState {
    pub use_cases: UrlUseCases,
    pub registry: Arc<UrlRegistry>,
    pub signer: Arc<IdentitySigner>,
    /// Public prefix for short links, always ending in `/`.
    pub base_url: Arc<str>,
}

impl AppState {
    /// Wires registry, use cases and signer on top of `storage`.
    pub fn new(
        storage: Arc<dyn UrlStorage>,
        hasher: Arc<dyn HashGenerator>,
        signer: IdentitySigner,
        base_url: &str,
        timeouts: Timeouts,
    ) -> Self {
        let registry = Arc::new(UrlRegistry::new(storage));
        let use_cases = UrlUseCases::new(registry.clone(), hasher, timeouts);

        Self {
            use_cases,
            registry,
            signer: Arc::new(signer),
            base_url: Arc::from(format!("{}/", base_url.trim_end_matches('/'))),
        }
    }

    /// Full short link for `hash`.
    pub fn short_url(&self, hash: &str) -> String {
        format!("{}{}", self.base_url, hash)
    }
}
