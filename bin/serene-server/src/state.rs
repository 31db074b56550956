//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::provider::ChatProvider;

/// State shared across all HTTP handlers.
///
/// Read-only after startup: requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// The upstream model every relay call is forwarded to.
    pub provider: Arc<dyn ChatProvider>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn ChatProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
