//! Shared type definitions for the Robot Animal Interaction API.
//!
//! This crate is the single source of truth for the JSON shapes exchanged
//! with the web dashboard. Types flow downstream to `TypeScript` via
//! `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for sources, sessions, and events
//! - [`enums`] -- Source types, profiles, session states, event kinds
//! - [`structs`] -- Sources, sessions, typed event payloads, event pages

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{EventKind, Profile, SessionState, SourceType};
pub use ids::{EventId, SessionId, SourceId};
pub use structs::{
    AgentPayload, BoundingBox, DetectedObject, DetectionPayload, ErrorPayload, Event, EventPayload,
    EventsPage, MetricPayload, Session, Source, TranscriptPayload,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Files are written to `bindings/` relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::SourceId::export_all();
        let _ = crate::ids::SessionId::export_all();
        let _ = crate::ids::EventId::export_all();

        let _ = crate::enums::SourceType::export_all();
        let _ = crate::enums::Profile::export_all();
        let _ = crate::enums::SessionState::export_all();
        let _ = crate::enums::EventKind::export_all();

        let _ = crate::structs::Source::export_all();
        let _ = crate::structs::Session::export_all();
        let _ = crate::structs::Event::export_all();
        let _ = crate::structs::EventPayload::export_all();
        let _ = crate::structs::EventsPage::export_all();
    }
}
