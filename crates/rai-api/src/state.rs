//! Shared application state for the API server.
//!
//! [`AppState`] holds the [`Store`] and the loaded [`ApiConfig`]. It is
//! wrapped in [`Arc`] and injected into handlers via Axum's `State`
//! extractor. Handlers never hold the store's lock themselves; they call
//! store operations that take and release it internally.

use std::sync::Arc;

use rai_store::Store;

use crate::config::ApiConfig;

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Sources, sessions, and events.
    pub store: Arc<Store>,
    /// Configuration the server was started with.
    pub config: ApiConfig,
}

impl AppState {
    /// Create application state with an empty store and default config.
    pub fn new() -> Self {
        Self::with_config(ApiConfig::default())
    }

    /// Create application state with an empty store and the given config.
    pub fn with_config(config: ApiConfig) -> Self {
        Self {
            store: Arc::new(Store::new()),
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
