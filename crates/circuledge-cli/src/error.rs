use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] circuledge_core::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Edited note content cannot be empty")]
    EmptyEditedContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Server URL must start with http:// or https://: {0}")]
    InvalidServerUrl(String),
    #[error("Save conflicted and was not resolved; your text is kept in {}", .0.display())]
    UnresolvedConflict(PathBuf),
    #[error("Save failed: {message}; your text is kept in {}", .recovery.display())]
    SaveFailed { message: String, recovery: PathBuf },
}
