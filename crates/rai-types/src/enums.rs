//! Enumeration types shared by the store, the API, and the dashboard.
//!
//! All enums serialize as lowercase strings so the JSON wire format reads
//! `"webcam"`, `"fast"`, `"running"`, and so on.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Source types
// ---------------------------------------------------------------------------

/// The kind of media input a [`Source`](crate::Source) describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Network camera reachable over RTSP.
    Rtsp,
    /// Locally attached USB camera.
    Usb,
    /// Browser or built-in webcam.
    Webcam,
    /// Placeholder for an uploaded file.
    Upload,
}

impl SourceType {
    /// Wire name of the source type, as used in derived labels.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rtsp => "rtsp",
            Self::Usb => "usb",
            Self::Webcam => "webcam",
            Self::Upload => "upload",
        }
    }
}

impl core::fmt::Display for SourceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Session settings
// ---------------------------------------------------------------------------

/// Inference profile requested for a session.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Low-latency models (default).
    #[default]
    Fast,
    /// Larger, slower models.
    Accurate,
    /// CPU-only execution.
    Cpu,
}

/// Lifecycle state of a session.
///
/// Sessions start [`Running`](Self::Running) and move to
/// [`Stopped`](Self::Stopped) only through an explicit stop request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// The session is producing events.
    Running,
    /// The session was stopped by a client. Its events remain readable.
    Stopped,
}

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

/// Discriminant of an [`EventPayload`](crate::EventPayload).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Objects detected in a video frame.
    Detection,
    /// A fragment of transcribed speech.
    Transcript,
    /// An action taken by the robot agent.
    Agent,
    /// A pipeline performance sample.
    Metric,
    /// A pipeline failure report.
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_type_wire_names() {
        for (ty, name) in [
            (SourceType::Rtsp, "rtsp"),
            (SourceType::Usb, "usb"),
            (SourceType::Webcam, "webcam"),
            (SourceType::Upload, "upload"),
        ] {
            assert_eq!(ty.as_str(), name);
            assert_eq!(ty.to_string(), name);
            let json = serde_json::to_string(&ty).ok();
            assert_eq!(json, Some(format!("\"{name}\"")));
        }
    }

    #[test]
    fn profile_defaults_to_fast() {
        assert_eq!(Profile::default(), Profile::Fast);
        let parsed: Result<Profile, _> = serde_json::from_str("\"accurate\"");
        assert_eq!(parsed.ok(), Some(Profile::Accurate));
    }

    #[test]
    fn unknown_source_type_is_rejected() {
        let parsed: Result<SourceType, _> = serde_json::from_str("\"satellite\"");
        assert!(parsed.is_err());
    }
}
