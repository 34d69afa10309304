//! Error types for circuledge-core

use thiserror::Error;

use crate::workflow::WorkflowError;

/// Result type alias using circuledge-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in circuledge-core operations
///
/// Revision conflicts are deliberately absent: they are ordinary outcomes of
/// an update and travel as result variants, never as errors.
#[derive(Error, Debug)]
pub enum Error {
    /// Note (or other keyed record) not found
    #[error("Note not found: {0}")]
    NotFound(String),

    /// Input failed structural validation before reaching the store
    #[error("Malformed input: {0}")]
    Malformed(String),

    /// Transport-level failure; the user may retry
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client workflow misuse
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}
