//! Demo event seeding for new sessions.
//!
//! Every session starts with the same three events: one detection, one
//! transcript fragment, and one metric snapshot, 100 ms apart. Only the
//! timestamps and event IDs vary between sessions.

use chrono::{DateTime, TimeDelta, Utc};
use rai_types::{
    BoundingBox, DetectedObject, DetectionPayload, Event, EventId, EventPayload, MetricPayload,
    TranscriptPayload,
};

/// Offset of each seeded event from the session's creation instant.
const SEED_OFFSETS_MS: [i64; 3] = [0, 100, 200];

/// Build the demo event sequence for a session created at `now`.
///
/// Events come back in chronological order: detection, transcript, metric.
pub fn seed_events(now: DateTime<Utc>) -> Vec<Event> {
    let [detection_ms, transcript_ms, metric_ms] = SEED_OFFSETS_MS;

    vec![
        Event {
            id: EventId::new(),
            timestamp: offset_seconds(now, detection_ms),
            body: EventPayload::Detection(DetectionPayload {
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
            }),
        },
        Event {
            id: EventId::new(),
            timestamp: offset_seconds(now, transcript_ms),
            body: EventPayload::Transcript(TranscriptPayload {
                text: String::from("Good dog, sit."),
                speaker: Some(String::from("handler")),
                is_final: true,
            }),
        },
        Event {
            id: EventId::new(),
            timestamp: offset_seconds(now, metric_ms),
            body: EventPayload::Metric(MetricPayload {
                fps: 15.0,
                latency_ms: 85,
                queue_depth: 0,
            }),
        },
    ]
}

/// Fractional Unix seconds for `at`.
// i64 micros only lose precision as f64 past 2^53 (about 285 years).
#[allow(clippy::cast_precision_loss)]
pub fn unix_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_micros() as f64 / 1_000_000.0
}

fn offset_seconds(now: DateTime<Utc>, offset_ms: i64) -> f64 {
    let at = now
        .checked_add_signed(TimeDelta::milliseconds(offset_ms))
        .unwrap_or(now);
    unix_seconds(at)
}
