//! circuledge-core - Core library for Circuledge
//!
//! Shared models, the in-memory revision store, line diffing, conflict
//! detection, and the client edit workflow used by the API server and CLI.

pub mod config;
pub mod conflict;
pub mod diff;
pub mod error;
pub mod models;
pub mod store;
pub mod util;
pub mod wire;
pub mod workflow;

pub use error::{Error, Result};
pub use models::{ConflictPayload, Note, NoteId, RevisionId, RevisionedSnapshot};
