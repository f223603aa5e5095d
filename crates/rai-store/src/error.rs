//! Error types for the store.
//!
//! The store never fails on creation; lookups by ID fail with a
//! not-found variant naming the missing entity.

use rai_types::{SessionId, SourceId};

/// Errors that can occur in store operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// No source is registered under the given ID.
    #[error("source {0} not found")]
    SourceNotFound(SourceId),

    /// No session is registered under the given ID.
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
}
