//! Core entity structs: sources, sessions, events, and event pages.
//!
//! Field names serialize as `camelCase` to match the dashboard's `TypeScript`
//! interfaces (`sourceId`, `deviceId`, `nextCursor`, `latencyMs`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{EventKind, Profile, SessionState, SourceType};
use crate::ids::{EventId, SessionId, SourceId};

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// A registered media input (camera, stream, or upload placeholder).
///
/// Sources are created once and never mutated. The label is always
/// resolved at creation time, either from the request or derived from the
/// type and ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Source {
    /// Unique source identifier.
    pub id: SourceId,
    /// Kind of media input.
    #[serde(rename = "type")]
    pub source_type: SourceType,
    /// Stream URL (RTSP sources).
    pub url: Option<String>,
    /// Device identifier (USB sources).
    pub device_id: Option<String>,
    /// Display label.
    pub label: String,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A running analysis context bound to one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier.
    pub id: SessionId,
    /// The source this session reads from, copied verbatim from the
    /// request. Not checked against registered sources.
    pub source_id: String,
    /// Pipeline name to enabled flag (`vision`, `audio`, `llm`, ...).
    pub pipelines: BTreeMap<String, bool>,
    /// Inference profile.
    pub profile: Profile,
    /// Lifecycle state.
    pub state: SessionState,
}

// ---------------------------------------------------------------------------
// Event payloads
// ---------------------------------------------------------------------------

/// Axis-aligned bounding box in normalized frame coordinates (0.0 to 1.0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct BoundingBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

/// A single object found in a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DetectedObject {
    /// Class label (e.g. `dog`).
    pub label: String,
    /// Detector confidence (0.0 to 1.0).
    pub score: f64,
    /// Where the object sits in the frame.
    pub bbox: BoundingBox,
}

/// Payload of a [`EventKind::Detection`] event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DetectionPayload {
    /// Objects detected in the frame.
    pub objects: Vec<DetectedObject>,
}

/// Payload of a [`EventKind::Transcript`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct TranscriptPayload {
    /// Transcribed text.
    pub text: String,
    /// Speaker tag, when diarization assigned one.
    pub speaker: Option<String>,
    /// Whether the fragment is final or may still be revised.
    pub is_final: bool,
}

/// Payload of a [`EventKind::Agent`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentPayload {
    /// Action name (e.g. `approach`, `vocalize`).
    pub action: String,
    /// Free-form detail about the action.
    pub detail: Option<String>,
}

/// Payload of a [`EventKind::Metric`] event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct MetricPayload {
    /// Frames processed per second.
    pub fps: f64,
    /// End-to-end pipeline latency in milliseconds.
    pub latency_ms: u32,
    /// Frames waiting in the inference queue.
    pub queue_depth: u32,
}

/// Payload of a [`EventKind::Error`] event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ErrorPayload {
    /// Human-readable failure description.
    pub message: String,
    /// Machine-readable error code.
    pub code: Option<String>,
}

/// Strongly-typed event payload keyed by event type.
///
/// Serializes adjacently tagged, so an event reads
/// `{"type": "metric", "payload": {"fps": 15.0, ...}}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum EventPayload {
    /// Objects detected in a frame.
    Detection(DetectionPayload),
    /// Transcribed speech.
    Transcript(TranscriptPayload),
    /// Robot agent action.
    Agent(AgentPayload),
    /// Pipeline performance sample.
    Metric(MetricPayload),
    /// Pipeline failure.
    Error(ErrorPayload),
}

impl EventPayload {
    /// Return the discriminant of this payload.
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Detection(_) => EventKind::Detection,
            Self::Transcript(_) => EventKind::Transcript,
            Self::Agent(_) => EventKind::Agent,
            Self::Metric(_) => EventKind::Metric,
            Self::Error(_) => EventKind::Error,
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A timestamped record belonging to exactly one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Unique event identifier.
    pub id: EventId,
    /// Seconds since the Unix epoch (fractional).
    pub timestamp: f64,
    /// Typed payload; flattened into `type` + `payload` fields.
    #[serde(flatten)]
    pub body: EventPayload,
}

impl Event {
    /// Return the event's type.
    pub const fn kind(&self) -> EventKind {
        self.body.kind()
    }
}

// ---------------------------------------------------------------------------
// EventsPage
// ---------------------------------------------------------------------------

/// One page of a session's event sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "camelCase")]
pub struct EventsPage {
    /// Events in insertion order.
    pub items: Vec<Event>,
    /// Offset of the next page, or `null` when the sequence is exhausted.
    #[ts(type = "number | null")]
    pub next_cursor: Option<usize>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn metric_event() -> Event {
        Event {
            id: EventId::new(),
            timestamp: 1_700_000_000.5,
            body: EventPayload::Metric(MetricPayload {
                fps: 15.0,
                latency_ms: 80,
                queue_depth: 0,
            }),
        }
    }

    #[test]
    fn event_wire_shape_is_type_plus_payload() {
        let event = metric_event();
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "metric");
        assert_eq!(json["payload"]["latencyMs"], 80);
        assert_eq!(json["payload"]["queueDepth"], 0);
        assert!(json["payload"]["fps"].is_number());
        assert_eq!(json["id"], event.id.to_string());
    }

    #[test]
    fn event_deserializes_from_wire_shape() {
        let raw = serde_json::json!({
            "id": EventId::new(),
            "timestamp": 12.25,
            "type": "transcript",
            "payload": { "text": "good dog", "speaker": null, "isFinal": true },
        });
        let event: Event = serde_json::from_value(raw).unwrap();
        assert_eq!(event.kind(), EventKind::Transcript);
        match event.body {
            EventPayload::Transcript(t) => {
                assert_eq!(t.text, "good dog");
                assert!(t.is_final);
            }
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn mismatched_payload_is_rejected() {
        let raw = serde_json::json!({
            "id": EventId::new(),
            "timestamp": 1.0,
            "type": "metric",
            "payload": { "text": "not a metric" },
        });
        assert!(serde_json::from_value::<Event>(raw).is_err());
    }

    #[test]
    fn source_serializes_type_field() {
        let source = Source {
            id: SourceId::new(),
            source_type: SourceType::Usb,
            url: None,
            device_id: Some(String::from("/dev/video0")),
            label: String::from("usb-abcdef"),
        };
        let json = serde_json::to_value(&source).unwrap();
        assert_eq!(json["type"], "usb");
        assert_eq!(json["deviceId"], "/dev/video0");
        assert!(json["url"].is_null());
    }

    #[test]
    fn exhausted_page_has_null_cursor() {
        let page = EventsPage {
            items: vec![metric_event()],
            next_cursor: None,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert!(json["nextCursor"].is_null());
        assert_eq!(json["items"].as_array().map(Vec::len), Some(1));
    }
}
