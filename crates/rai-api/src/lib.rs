//! HTTP and `WebSocket` API for the Robot Animal Interaction service.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Health and status** (`GET /health`, `GET /`)
//! - **Sources and sessions** backed by the in-memory
//!   [`Store`](rai_store::Store), including cursor pagination over a
//!   session's events
//! - **Upload and analyze endpoints** that accept multipart files and
//!   answer with filenames and canned results; no media is processed
//! - **`WebSocket` echo** (`/ws/stream`)
//!
//! # Architecture
//!
//! Handlers are stateless. Each one parses and validates its input, makes
//! at most one store call, and builds a response. The store serializes
//! all access behind a single lock; no handler holds it across an await.

pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_server};
pub use state::AppState;
