//! Configuration loading and typed config structures for the API server.
//!
//! Configuration lives in an optional YAML file (`rai-config.yaml` by
//! default). Every field has a default, so an empty file or no file at all
//! yields a working server. `RAI_HOST` and `RAI_PORT` override the bind
//! address after the file is parsed.

use std::path::Path;

use axum::http::HeaderValue;
use serde::Deserialize;

use crate::server::ServerConfig;

/// Value of `cors.allowed_origins` that switches to allow-any.
pub const ANY_ORIGIN: &str = "*";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is out of range or malformed.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level API configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Bind address.
    #[serde(default)]
    pub server: ServerConfig,

    /// Cross-origin policy for the dashboard.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Event pagination limits.
    #[serde(default)]
    pub events: EventsConfig,

    /// Log filter defaults.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ApiConfig {
    /// Load configuration from a YAML file, then apply env overrides and
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, and
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply env overrides
    /// and validate.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.server.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.events.validate()?;
        self.cors.validate()
    }
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

/// Cross-origin resource sharing policy.
///
/// The default restricts access to the local dashboard origins with
/// credentials allowed. Listing `"*"` allows any origin; credentials are
/// then never sent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CorsConfig {
    /// Origins allowed to call the API.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Whether browsers may send cookies and auth headers.
    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,
}

impl CorsConfig {
    /// Whether the policy allows any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == ANY_ORIGIN)
    }

    /// Parse the configured origins into header values.
    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|e| ConfigError::Invalid(format!("bad CORS origin {origin:?}: {e}")))
            })
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.allows_any_origin() {
            if self.allowed_origins.len() > 1 {
                return Err(ConfigError::Invalid(String::from(
                    "\"*\" must be the only CORS origin",
                )));
            }
            return Ok(());
        }
        self.origin_headers().map(drop)
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            allow_credentials: default_allow_credentials(),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Pagination limits for `GET /sessions/{id}/events`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct EventsConfig {
    /// Page size when the request omits `limit`.
    #[serde(default = "default_page_limit")]
    pub default_page_limit: usize,

    /// Largest page size served; larger requests are clamped.
    #[serde(default = "default_max_page_limit")]
    pub max_page_limit: usize,
}

impl EventsConfig {
    fn validate(self) -> Result<(), ConfigError> {
        if self.default_page_limit == 0 || self.default_page_limit > self.max_page_limit {
            return Err(ConfigError::Invalid(format!(
                "events.default_page_limit must be within 1..={}, got {}",
                self.max_page_limit, self.default_page_limit
            )));
        }
        Ok(())
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            default_page_limit: default_page_limit(),
            max_page_limit: default_max_page_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. `info`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_allowed_origins() -> Vec<String> {
    vec![
        String::from("http://localhost:3000"),
        String::from("http://127.0.0.1:3000"),
    ]
}

const fn default_allow_credentials() -> bool {
    true
}

const fn default_page_limit() -> usize {
    50
}

const fn default_max_page_limit() -> usize {
    500
}

fn default_log_level() -> String {
    String::from("info")
}
