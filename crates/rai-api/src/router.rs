//! Axum router construction for the API.
//!
//! Assembles all routes (REST, uploads, `WebSocket`) into a single
//! [`Router`] with CORS and request tracing.

use std::sync::Arc;

use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::CorsConfig;
use crate::state::AppState;
use crate::{handlers, media, ws};

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /` -- minimal HTML status page
/// - `GET /health` -- readiness map
/// - `POST /sources`, `GET /sources/{id}`
/// - `POST /sessions`, `GET /sessions/{id}`, `POST /sessions/{id}/stop`
/// - `GET /sessions/{id}/events` -- cursor pagination
/// - `POST /upload/video`, `/upload/image`, `/upload/audio`
/// - `POST /analyze/frame`, `/analyze/audio`
/// - `GET /ws/stream` -- `WebSocket` echo
///
/// CORS follows `state.config.cors`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        // Status
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        // Sources and sessions
        .route("/sources", post(handlers::create_source))
        .route("/sources/{id}", get(handlers::get_source))
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}/stop", post(handlers::stop_session))
        .route("/sessions/{id}/events", get(handlers::list_events))
        // Media
        .route("/upload/video", post(media::upload_video))
        .route("/upload/image", post(media::upload_image))
        .route("/upload/audio", post(media::upload_audio))
        .route("/analyze/frame", post(media::analyze_frame))
        .route("/analyze/audio", post(media::analyze_audio))
        // WebSocket
        .route("/ws/stream", get(ws::ws_stream))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer for the configured policy.
///
/// A `"*"` origin allows any origin, method, and header without
/// credentials. Otherwise only the listed origins are allowed, with
/// credentials if configured. Origins were checked when the config was
/// validated, so an origin that fails to parse here yields an empty list.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins = config.origin_headers().unwrap_or_else(|e| {
        warn!(error = %e, "CORS origins rejected; allowing none");
        Vec::new()
    });

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(config.allow_credentials)
}
