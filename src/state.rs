//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration and the bearer token verifier.

use crate::config::ConfigV1;
use crate::verifier::TokenVerifier;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; both members are immutable after start-up, so
/// requests are verified independently with no locking.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Verifier guarding the protected API routes.
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    /// Builds the state from a loaded configuration.
    pub fn new(config: Arc<ConfigV1>) -> Result<Self, String> {
        let verifier = Arc::new(TokenVerifier::new(&config.identity)?);
        Ok(AppState { config, verifier })
    }
}
