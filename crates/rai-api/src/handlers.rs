//! REST endpoint handlers for sources, sessions, and events.
//!
//! Each handler is a thin translation: parse the request into a typed
//! input, validate it, make at most one [`Store`](rai_store::Store) call,
//! and shape the response.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/` | Minimal HTML status page |
//! | `GET` | `/health` | Readiness map |
//! | `POST` | `/sources` | Register a media source |
//! | `GET` | `/sources/{id}` | Get a source |
//! | `POST` | `/sessions` | Start a session (seeds demo events) |
//! | `GET` | `/sessions/{id}` | Get a session |
//! | `POST` | `/sessions/{id}/stop` | Stop a session |
//! | `GET` | `/sessions/{id}/events` | Page through a session's events |

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use rai_store::{NewSession, NewSource};
use rai_types::{Profile, SessionId, SessionState, SourceId, SourceType};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request and response bodies
// ---------------------------------------------------------------------------

/// Body of `POST /sources`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceRequest {
    /// Kind of media input.
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Stream URL (RTSP sources).
    pub url: Option<String>,
    /// Device identifier (USB sources).
    pub device_id: Option<String>,
    /// Display label.
    pub label: Option<String>,
}

impl CreateSourceRequest {
    /// Map the body onto a store input. Blank locators are treated as
    /// absent; a blank label is kept so the store derives one.
    pub fn into_new_source(self) -> NewSource {
        NewSource {
            source_type: self.source_type,
            url: non_blank(self.url),
            device_id: non_blank(self.device_id),
            label: self.label,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Response of `POST /sources`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSourceResponse {
    /// The generated source ID.
    pub source_id: SourceId,
    /// The resolved label.
    pub label: String,
}

/// Body of `POST /sessions`.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Source to read from. Stored as given; not checked against
    /// registered sources.
    pub source_id: String,
    /// Pipeline toggles. Defaults to vision only.
    pub pipelines: Option<BTreeMap<String, bool>>,
    /// Inference profile. Defaults to `fast`.
    pub profile: Option<Profile>,
}

impl CreateSessionRequest {
    /// Reject a blank `sourceId` and fill in defaults.
    pub fn validate(self) -> Result<NewSession, ApiError> {
        if self.source_id.trim().is_empty() {
            return Err(ApiError::Validation(String::from(
                "sourceId must not be blank",
            )));
        }
        Ok(NewSession {
            source_id: self.source_id,
            pipelines: self.pipelines.unwrap_or_else(default_pipelines),
            profile: self.profile.unwrap_or_default(),
        })
    }
}

/// Response of `POST /sessions` and `POST /sessions/{id}/stop`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateResponse {
    /// The session ID.
    pub session_id: SessionId,
    /// Current lifecycle state.
    pub state: SessionState,
}

/// Query parameters for `GET /sessions/{id}/events`.
#[derive(Debug, serde::Deserialize)]
pub struct EventsQuery {
    /// Offset of the first event to return (default 0).
    pub cursor: Option<usize>,
    /// Page size (default and maximum come from config).
    pub limit: Option<usize>,
}

fn default_pipelines() -> BTreeMap<String, bool> {
    BTreeMap::from([
        (String::from("vision"), true),
        (String::from("audio"), false),
        (String::from("llm"), false),
    ])
}

// ---------------------------------------------------------------------------
// GET / -- minimal HTML status page
// ---------------------------------------------------------------------------

/// Serve a minimal HTML page with store counts and endpoint links.
pub async fn index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let stats = state.store.stats().await;
    let sources = stats.sources;
    let sessions = stats.sessions;
    let events = stats.events;

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <title>Robot Animal Interaction API</title>
    <style>
        body {{ font-family: system-ui, sans-serif; padding: 2rem; max-width: 720px; margin: 0 auto; }}
        .metric {{ display: inline-block; border: 1px solid #ccd; border-radius: 6px; padding: 0.75rem 1.25rem; margin: 0.5rem 0.5rem 0.5rem 0; }}
        .metric .value {{ font-size: 1.4rem; font-weight: bold; }}
        code {{ background: #f3f3f6; padding: 0 0.25rem; }}
    </style>
</head>
<body>
    <h1>Robot Animal Interaction API</h1>
    <p>Status: <strong>RUNNING</strong></p>
    <div>
        <div class="metric"><div>Sources</div><div class="value">{sources}</div></div>
        <div class="metric"><div>Sessions</div><div class="value">{sessions}</div></div>
        <div class="metric"><div>Events</div><div class="value">{events}</div></div>
    </div>
    <h2>Endpoints</h2>
    <ul>
        <li><a href="/health">GET /health</a></li>
        <li><code>POST /sources</code>, <code>GET /sources/{{id}}</code></li>
        <li><code>POST /sessions</code>, <code>GET /sessions/{{id}}</code>, <code>POST /sessions/{{id}}/stop</code></li>
        <li><code>GET /sessions/{{id}}/events?cursor=0&amp;limit=50</code></li>
        <li><code>POST /upload/video|image|audio</code>, <code>POST /analyze/frame|audio</code></li>
        <li><code>ws://host:port/ws/stream</code> -- echo socket</li>
    </ul>
</body>
</html>"#
    ))
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

/// Report readiness. Always `ok` while the process is serving.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "services": { "api": "ok" },
    }))
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Register a media source and return its ID and resolved label.
pub async fn create_source(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSourceRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let new = request.into_new_source();

    let source = state.store.create_source(new).await;
    info!(source_id = %source.id, source_type = %source.source_type, label = %source.label, "Source created");

    Ok((
        StatusCode::CREATED,
        Json(CreateSourceResponse {
            source_id: source.id,
            label: source.label,
        }),
    ))
}

/// Return a single source.
pub async fn get_source(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: SourceId = parse_id(&id_str)?;
    let source = state.store.get_source(id).await?;
    Ok(Json(source))
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

/// Start a session. The response carries the initial `running` state; the
/// seeded events are immediately readable.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    let new = request.validate()?;

    let session = state.store.create_session(new).await;
    info!(session_id = %session.id, source_id = %session.source_id, profile = ?session.profile, "Session started");

    Ok((
        StatusCode::CREATED,
        Json(SessionStateResponse {
            session_id: session.id,
            state: session.state,
        }),
    ))
}

/// Return a single session.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: SessionId = parse_id(&id_str)?;
    let session = state.store.get_session(id).await?;
    Ok(Json(session))
}

/// Stop a session. Idempotent.
pub async fn stop_session(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: SessionId = parse_id(&id_str)?;
    let session = state.store.stop_session(id).await?;
    info!(session_id = %id, "Session stopped");

    Ok(Json(SessionStateResponse {
        session_id: session.id,
        state: session.state,
    }))
}

// ---------------------------------------------------------------------------
// GET /sessions/{id}/events
// ---------------------------------------------------------------------------

/// Page through a session's events.
///
/// # Query Parameters
///
/// - `cursor`: offset of the first event (default 0).
/// - `limit`: page size (default 50, clamped to the configured maximum).
///   Zero is rejected.
///
/// Unknown sessions yield 404 rather than an empty page.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
    params: Result<Query<EventsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id: SessionId = parse_id(&id_str)?;
    let Query(params) = params?;

    let limits = state.config.events;
    let limit = params.limit.unwrap_or(limits.default_page_limit);
    if limit == 0 {
        return Err(ApiError::InvalidQuery(String::from(
            "limit must be at least 1",
        )));
    }
    let limit = limit.min(limits.max_page_limit);
    let cursor = params.cursor.unwrap_or(0);

    let page = state.store.list_events(id, cursor, limit).await?;
    Ok(Json(page))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a typed ID from a path segment, returning an [`ApiError`] on failure.
fn parse_id<T>(s: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    s.parse::<T>()
        .map_err(|e| ApiError::InvalidUuid(format!("{s}: {e}")))
}
