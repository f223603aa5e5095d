//! Upload and analyze endpoints.
//!
//! None of these handlers decode or inspect media. They read the
//! multipart `file` field, drain its bytes, and answer with the filename.
//! The analyze endpoints additionally return fixed detection, transcript,
//! and latency values so the dashboard has something to render.

use axum::Json;
use axum::extract::Multipart;
use axum::extract::multipart::MultipartRejection;
use axum::response::IntoResponse;
use rai_types::{BoundingBox, DetectedObject};
use tracing::debug;

use crate::error::ApiError;

/// Name of the multipart field carrying the uploaded file.
pub const FILE_FIELD: &str = "file";

/// Canned latency reported by `POST /analyze/frame`.
pub const FRAME_LATENCY_MS: u32 = 42;

/// Canned latency reported by `POST /analyze/audio`.
pub const AUDIO_LATENCY_MS: u32 = 120;

/// Canned transcript returned by `POST /analyze/audio`.
pub const CANNED_TRANSCRIPT: &str = "Good dog, sit.";

/// Kind of media accepted by the upload endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// `POST /upload/video`
    Video,
    /// `POST /upload/image`
    Image,
    /// `POST /upload/audio`
    Audio,
}

impl MediaKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }
}

/// Response of the upload endpoints.
#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    /// `"<kind> received"`.
    pub message: String,
    /// Client-supplied filename, if any.
    pub filename: Option<String>,
}

/// Response of `POST /analyze/frame`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameAnalysisResponse {
    /// Status message.
    pub message: &'static str,
    /// Client-supplied filename, if any.
    pub filename: Option<String>,
    /// Canned detections.
    pub objects: Vec<DetectedObject>,
    /// Canned latency.
    pub latency_ms: u32,
}

/// Response of `POST /analyze/audio`.
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioAnalysisResponse {
    /// Status message.
    pub message: &'static str,
    /// Client-supplied filename, if any.
    pub filename: Option<String>,
    /// Canned transcript.
    pub transcript: &'static str,
    /// Canned latency.
    pub latency_ms: u32,
}

// ---------------------------------------------------------------------------
// POST /upload/{video,image,audio}
// ---------------------------------------------------------------------------

/// Accept a video upload.
pub async fn upload_video(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    receive_upload(MediaKind::Video, multipart?).await
}

/// Accept an image upload.
pub async fn upload_image(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    receive_upload(MediaKind::Image, multipart?).await
}

/// Accept an audio upload.
pub async fn upload_audio(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    receive_upload(MediaKind::Audio, multipart?).await
}

async fn receive_upload(
    kind: MediaKind,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let filename = read_file_field(multipart).await?;
    Ok(Json(UploadResponse {
        message: format!("{} received", kind.as_str()),
        filename,
    }))
}

// ---------------------------------------------------------------------------
// POST /analyze/{frame,audio}
// ---------------------------------------------------------------------------

/// "Analyze" a frame. Returns one canned detection.
pub async fn analyze_frame(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filename = read_file_field(multipart?).await?;
    Ok(Json(FrameAnalysisResponse {
        message: "frame analyzed",
        filename,
        objects: vec![DetectedObject {
            label: String::from("dog"),
            score: 0.92,
            bbox: BoundingBox {
                x: 0.12,
                y: 0.30,
                width: 0.25,
                height: 0.40,
            },
        }],
        latency_ms: FRAME_LATENCY_MS,
    }))
}

/// "Analyze" an audio clip. Returns a canned transcript.
pub async fn analyze_audio(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let filename = read_file_field(multipart?).await?;
    Ok(Json(AudioAnalysisResponse {
        message: "audio analyzed",
        filename,
        transcript: CANNED_TRANSCRIPT,
        latency_ms: AUDIO_LATENCY_MS,
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Find the `file` field, drain it, and return its filename.
///
/// Other fields are skipped. A body without a `file` field fails with
/// [`ApiError::Validation`].
async fn read_file_field(mut multipart: Multipart) -> Result<Option<String>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await?;
        debug!(filename = ?filename, size = bytes.len(), "upload received");
        return Ok(filename);
    }
    Err(ApiError::Validation(format!(
        "missing multipart field `{FILE_FIELD}`"
    )))
}
