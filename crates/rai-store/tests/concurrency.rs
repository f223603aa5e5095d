//! Concurrent access tests for the [`Store`].
//!
//! Sessions are created from many tasks at once; each must end up with
//! its own ID and its own independent seeded event sequence.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use rai_store::{NewSession, Store};
use rai_types::{Event, EventKind, Profile, SessionState};

fn new_session(source_id: String) -> NewSession {
    NewSession {
        source_id,
        pipelines: BTreeMap::new(),
        profile: Profile::Cpu,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_session_creation_keeps_sessions_independent() {
    let store = Arc::new(Store::new());

    let mut handles = Vec::new();
    for i in 0..32 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store.create_session(new_session(format!("cam-{i}"))).await
        }));
    }

    let mut ids = BTreeSet::new();
    for handle in handles {
        let session = handle.await.unwrap();
        assert_eq!(session.state, SessionState::Running);
        ids.insert(session.id);

        let page = store.list_events(session.id, 0, 50).await.unwrap();
        let kinds: Vec<EventKind> = page.items.iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Detection, EventKind::Transcript, EventKind::Metric]
        );
        assert_eq!(page.next_cursor, None);
    }

    assert_eq!(ids.len(), 32);
    let stats = store.stats().await;
    assert_eq!(stats.sessions, 32);
    assert_eq!(stats.events, 96);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn two_callers_get_distinct_sessions() {
    let store = Arc::new(Store::new());

    let (a, b) = tokio::join!(
        {
            let store = Arc::clone(&store);
            async move { store.create_session(new_session(String::from("left"))).await }
        },
        {
            let store = Arc::clone(&store);
            async move { store.create_session(new_session(String::from("right"))).await }
        }
    );

    assert_ne!(a.id, b.id);

    let events_a = store.list_events(a.id, 0, 50).await.unwrap();
    let events_b = store.list_events(b.id, 0, 50).await.unwrap();
    assert_eq!(events_a.items.len(), 3);
    assert_eq!(events_b.items.len(), 3);

    let ids_a: BTreeSet<_> = events_a.items.iter().map(|e| e.id).collect();
    let ids_b: BTreeSet<_> = events_b.items.iter().map(|e| e.id).collect();
    assert!(ids_a.is_disjoint(&ids_b));
}
