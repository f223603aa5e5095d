//! The in-memory registry of sources, sessions, and session events.
//!
//! [`Store`] owns three maps behind a single [`Mutex`]:
//!
//! - source ID -> [`Source`]
//! - session ID -> [`Session`]
//! - session ID -> ordered [`Event`] sequence
//!
//! The lock is coarse: every operation takes it once, does its reads or
//! writes, and releases it before returning. Nothing awaits while the
//! lock is held. Callers only ever receive clones; the maps never leave
//! the store.

use std::collections::BTreeMap;

use chrono::Utc;
use rai_types::{
    Event, EventId, EventPayload, EventsPage, Profile, Session, SessionId, SessionState, Source,
    SourceId, SourceType,
};
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::StoreError;
use crate::seed;

/// Number of ID characters used in a derived source label.
const LABEL_ID_PREFIX_LEN: usize = 6;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Parameters for registering a new source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSource {
    /// Kind of media input.
    pub source_type: SourceType,
    /// Stream URL (RTSP sources).
    pub url: Option<String>,
    /// Device identifier (USB sources).
    pub device_id: Option<String>,
    /// Display label. A missing or blank label is derived from the type
    /// and the generated ID.
    pub label: Option<String>,
}

/// Parameters for starting a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSession {
    /// Source the session reads from, stored verbatim.
    pub source_id: String,
    /// Pipeline name to enabled flag.
    pub pipelines: BTreeMap<String, bool>,
    /// Inference profile.
    pub profile: Profile,
}

/// Entity counts reported by [`Store::stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Registered sources.
    pub sources: usize,
    /// Sessions in any state.
    pub sessions: usize,
    /// Events across all sessions.
    pub events: usize,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Registry {
    sources: BTreeMap<SourceId, Source>,
    sessions: BTreeMap<SessionId, Session>,
    events: BTreeMap<SessionId, Vec<Event>>,
}

/// Thread-safe in-memory store. Share it behind an [`Arc`](std::sync::Arc).
#[derive(Debug, Default)]
pub struct Store {
    inner: Mutex<Registry>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source and return it with its resolved label.
    pub async fn create_source(&self, new: NewSource) -> Source {
        let id = SourceId::new();
        let label = match new.label {
            Some(label) if !label.trim().is_empty() => label,
            _ => derive_label(new.source_type, id),
        };

        let source = Source {
            id,
            source_type: new.source_type,
            url: new.url,
            device_id: new.device_id,
            label,
        };

        self.inner.lock().await.sources.insert(id, source.clone());

        debug!(source_id = %id, source_type = %source.source_type, "source registered");
        source
    }

    /// Look up a source by ID.
    pub async fn get_source(&self, id: SourceId) -> Result<Source, StoreError> {
        self.inner
            .lock()
            .await
            .sources
            .get(&id)
            .cloned()
            .ok_or(StoreError::SourceNotFound(id))
    }

    /// Start a session in the [`Running`](SessionState::Running) state.
    ///
    /// The session record and its seeded events are inserted under one
    /// lock acquisition, so no reader can observe a session without its
    /// events.
    pub async fn create_session(&self, new: NewSession) -> Session {
        let id = SessionId::new();
        let session = Session {
            id,
            source_id: new.source_id,
            pipelines: new.pipelines,
            profile: new.profile,
            state: SessionState::Running,
        };
        let events = seed::seed_events(Utc::now());
        let seeded = events.len();

        {
            let mut registry = self.inner.lock().await;
            registry.sessions.insert(id, session.clone());
            registry.events.insert(id, events);
        }

        debug!(session_id = %id, source_id = %session.source_id, seeded, "session started");
        session
    }

    /// Look up a session by ID.
    pub async fn get_session(&self, id: SessionId) -> Result<Session, StoreError> {
        self.inner
            .lock()
            .await
            .sessions
            .get(&id)
            .cloned()
            .ok_or(StoreError::SessionNotFound(id))
    }

    /// Move a session to [`Stopped`](SessionState::Stopped).
    ///
    /// Stopping an already stopped session is a no-op. Events stay
    /// readable after the stop.
    pub async fn stop_session(&self, id: SessionId) -> Result<Session, StoreError> {
        let mut registry = self.inner.lock().await;
        let session = registry
            .sessions
            .get_mut(&id)
            .ok_or(StoreError::SessionNotFound(id))?;
        session.state = SessionState::Stopped;
        Ok(session.clone())
    }

    /// Append an event to a session, stamped with the current time.
    pub async fn append_event(
        &self,
        session_id: SessionId,
        body: EventPayload,
    ) -> Result<Event, StoreError> {
        let event = Event {
            id: EventId::new(),
            timestamp: seed::unix_seconds(Utc::now()),
            body,
        };

        let mut registry = self.inner.lock().await;
        if !registry.sessions.contains_key(&session_id) {
            return Err(StoreError::SessionNotFound(session_id));
        }
        registry
            .events
            .entry(session_id)
            .or_default()
            .push(event.clone());
        Ok(event)
    }

    /// Read the page `[cursor, cursor + limit)` of a session's events.
    ///
    /// `next_cursor` is the offset just past the returned items when more
    /// events remain, and `None` once the sequence is exhausted. A cursor
    /// past the end yields an empty, exhausted page. A `limit` of zero
    /// yields no items and leaves the cursor where it was.
    pub async fn list_events(
        &self,
        session_id: SessionId,
        cursor: usize,
        limit: usize,
    ) -> Result<EventsPage, StoreError> {
        let registry = self.inner.lock().await;
        if !registry.sessions.contains_key(&session_id) {
            return Err(StoreError::SessionNotFound(session_id));
        }

        let events = registry
            .events
            .get(&session_id)
            .map_or(&[][..], Vec::as_slice);

        let items: Vec<Event> = events
            .iter()
            .skip(cursor)
            .take(limit)
            .cloned()
            .collect();

        let end = cursor.saturating_add(items.len());
        let next_cursor = (end < events.len()).then_some(end);

        Ok(EventsPage { items, next_cursor })
    }

    /// Count stored entities.
    pub async fn stats(&self) -> StoreStats {
        let registry = self.inner.lock().await;
        StoreStats {
            sources: registry.sources.len(),
            sessions: registry.sessions.len(),
            events: registry.events.values().map(Vec::len).sum(),
        }
    }
}

/// Derive a display label: `"{type}-{first 6 chars of id}"`.
pub fn derive_label(source_type: SourceType, id: SourceId) -> String {
    let prefix: String = id.to_string().chars().take(LABEL_ID_PREFIX_LEN).collect();
    format!("{source_type}-{prefix}")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use rai_types::{AgentPayload, EventKind};

    use super::*;

    fn webcam() -> NewSource {
        NewSource {
            source_type: SourceType::Webcam,
            url: None,
            device_id: None,
            label: None,
        }
    }

    fn session_for(source_id: &str) -> NewSession {
        NewSession {
            source_id: source_id.to_owned(),
            pipelines: BTreeMap::from([(String::from("vision"), true)]),
            profile: Profile::default(),
        }
    }

    fn kinds(page: &EventsPage) -> Vec<EventKind> {
        page.items.iter().map(Event::kind).collect()
    }

    #[tokio::test]
    async fn missing_label_is_derived_from_type_and_id() {
        let store = Store::new();
        let source = store.create_source(webcam()).await;

        let id = source.id.to_string();
        let expected = format!("webcam-{}", id.get(..6).unwrap());
        assert_eq!(source.label, expected);
        assert_eq!(source.label.len(), "webcam-".len() + 6);
    }

    #[tokio::test]
    async fn blank_label_is_derived() {
        let store = Store::new();
        let source = store
            .create_source(NewSource {
                source_type: SourceType::Rtsp,
                url: Some(String::from("rtsp://cam.local/stream")),
                label: Some(String::from("   ")),
                ..webcam()
            })
            .await;
        assert!(source.label.starts_with("rtsp-"));
        assert_eq!(source.url.as_deref(), Some("rtsp://cam.local/stream"));
    }

    #[tokio::test]
    async fn explicit_label_is_kept() {
        let store = Store::new();
        let source = store
            .create_source(NewSource {
                label: Some(String::from("kennel cam")),
                ..webcam()
            })
            .await;
        assert_eq!(source.label, "kennel cam");
        assert_eq!(store.get_source(source.id).await.unwrap(), source);
    }

    #[tokio::test]
    async fn unknown_source_is_not_found() {
        let store = Store::new();
        let id = SourceId::new();
        assert_eq!(
            store.get_source(id).await,
            Err(StoreError::SourceNotFound(id))
        );
    }

    #[tokio::test]
    async fn new_session_is_running_with_three_seeded_events() {
        let store = Store::new();
        let session = store.create_session(session_for("cam-1")).await;

        assert_eq!(session.state, SessionState::Running);
        assert_eq!(session.source_id, "cam-1");
        assert_eq!(session.profile, Profile::Fast);

        let page = store.list_events(session.id, 0, 50).await.unwrap();
        assert_eq!(
            kinds(&page),
            vec![EventKind::Detection, EventKind::Transcript, EventKind::Metric]
        );
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn middle_page_returns_transcript_and_next_cursor() {
        let store = Store::new();
        let session = store.create_session(session_for("cam-1")).await;

        let page = store.list_events(session.id, 1, 1).await.unwrap();
        assert_eq!(kinds(&page), vec![EventKind::Transcript]);
        assert_eq!(page.next_cursor, Some(2));
    }

    #[tokio::test]
    async fn paging_walks_the_whole_sequence() {
        let store = Store::new();
        let session = store.create_session(session_for("cam-1")).await;

        let mut cursor = Some(0);
        let mut seen = Vec::new();
        while let Some(at) = cursor {
            let page = store.list_events(session.id, at, 2).await.unwrap();
            seen.extend(page.items);
            cursor = page.next_cursor;
        }
        assert_eq!(seen.len(), 3);
    }

    #[tokio::test]
    async fn cursor_past_end_is_empty_and_exhausted() {
        let store = Store::new();
        let session = store.create_session(session_for("cam-1")).await;

        let page = store.list_events(session.id, 10, 5).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn zero_limit_is_an_empty_range() {
        let store = Store::new();
        let session = store.create_session(session_for("cam-1")).await;

        let page = store.list_events(session.id, 1, 0).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, Some(1));

        let page = store.list_events(session.id, 3, 0).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, None);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let store = Store::new();
        let id = SessionId::new();
        assert_eq!(
            store.list_events(id, 0, 10).await,
            Err(StoreError::SessionNotFound(id))
        );
    }

    #[tokio::test]
    async fn stop_keeps_events_readable() {
        let store = Store::new();
        let session = store.create_session(session_for("cam-1")).await;

        let stopped = store.stop_session(session.id).await.unwrap();
        assert_eq!(stopped.state, SessionState::Stopped);
        let again = store.stop_session(session.id).await.unwrap();
        assert_eq!(again.state, SessionState::Stopped);

        let page = store.list_events(session.id, 0, 50).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(
            store.get_session(session.id).await.unwrap().state,
            SessionState::Stopped
        );
    }

    #[tokio::test]
    async fn appended_event_extends_the_sequence() {
        let store = Store::new();
        let session = store.create_session(session_for("cam-1")).await;

        let event = store
            .append_event(
                session.id,
                EventPayload::Agent(AgentPayload {
                    action: String::from("approach"),
                    detail: None,
                }),
            )
            .await
            .unwrap();

        let page = store.list_events(session.id, 3, 10).await.unwrap();
        assert_eq!(page.items, vec![event]);
        assert_eq!(page.next_cursor, None);

        let missing = SessionId::new();
        assert!(
            store
                .append_event(
                    missing,
                    EventPayload::Agent(AgentPayload {
                        action: String::from("wait"),
                        detail: None,
                    }),
                )
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn stats_count_everything() {
        let store = Store::new();
        store.create_source(webcam()).await;
        store.create_session(session_for("a")).await;
        store.create_session(session_for("b")).await;

        let stats = store.stats().await;
        assert_eq!(
            stats,
            StoreStats {
                sources: 1,
                sessions: 2,
                events: 6,
            }
        );
    }
}
