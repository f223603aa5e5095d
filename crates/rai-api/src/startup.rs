//! Background server startup for embedding and tests.
//!
//! Provides [`spawn_server`] which binds eagerly and then serves the API
//! on a background Tokio task. Binding before spawning means the caller
//! learns the real address (useful with port 0) and sees bind failures
//! as errors instead of log lines.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rai_api::server::ServerConfig;
//! use rai_api::startup::spawn_server;
//! use rai_api::state::AppState;
//! use std::sync::Arc;
//!
//! let config = ServerConfig { host: "127.0.0.1".into(), port: 0 };
//! let (addr, handle) = spawn_server(&config, Arc::new(AppState::new())).await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::router::build_router;
use crate::server::{ServerConfig, ServerError, bind};
use crate::state::AppState;

/// Errors that can occur when spawning the API server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the API server on a background Tokio task.
///
/// Returns the bound address and a [`JoinHandle`]. The server runs until
/// the task is aborted or the runtime shuts down.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address is invalid or cannot
/// be bound.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<(SocketAddr, JoinHandle<()>), StartupError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;

    let router = build_router(state);
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "API server exited with error");
        }
    });

    tracing::info!(%addr, "API server spawned on background task");

    Ok((addr, handle))
}
