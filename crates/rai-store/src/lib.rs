//! In-memory state for the Robot Animal Interaction API.
//!
//! All state lives for the lifetime of the process. There is no
//! persistence backend.
//!
//! # Modules
//!
//! - [`store`] -- [`Store`]: sources, sessions, and event pagination
//! - [`seed`] -- Demo events every new session starts with
//! - [`error`] -- Not-found errors

pub mod error;
pub mod seed;
pub mod store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use store::{NewSession, NewSource, Store, StoreStats, derive_label};
