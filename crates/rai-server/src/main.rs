//! Server binary for the Robot Animal Interaction API.
//!
//! Loads configuration, initializes logging, builds the shared state, and
//! serves the HTTP/`WebSocket` API until `Ctrl-C`.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `rai-config.yaml` (or `RAI_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the in-memory store
//! 4. Serve until shutdown

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use rai_api::config::LoggingConfig;
use rai_api::{ApiConfig, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "rai-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, or the server fails.
#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Load configuration. Logging is not up yet, so remember whether
    //    a file was found and report it afterwards.
    let (config, config_path) = load_config()?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!("rai-server starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }
    info!(
        host = config.server.host,
        port = config.server.port,
        allowed_origins = ?config.cors.allowed_origins,
        default_page_limit = config.events.default_page_limit,
        max_page_limit = config.events.max_page_limit,
        "Effective configuration"
    );

    // 3. Create the store.
    let server_config = config.server.clone();
    let state = Arc::new(AppState::with_config(config));

    // 4. Serve.
    rai_api::start_server(&server_config, Arc::clone(&state)).await?;

    let stats = state.store.stats().await;
    info!(
        sources = stats.sources,
        sessions = stats.sessions,
        events = stats.events,
        "rai-server exiting"
    );
    Ok(())
}

/// Load configuration from `RAI_CONFIG` or `rai-config.yaml`.
///
/// Falls back to defaults (plus env overrides) when the file does not
/// exist. Returns the path that was read, if any.
fn load_config() -> Result<(ApiConfig, Option<PathBuf>), AppError> {
    let path = std::env::var("RAI_CONFIG")
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if path.exists() {
        let config = ApiConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        let config = ApiConfig::parse("{}")?;
        Ok((config, None))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(config: &LoggingConfig) -> Result<(), AppError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.map_err(|e| AppError::Logging {
        message: format!("{e}"),
    })
}
