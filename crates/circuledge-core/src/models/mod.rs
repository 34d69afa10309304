//! Data models for Circuledge

mod channel;
mod conflict;
mod note;
mod settings;

pub use channel::{Channel, ChannelId};
pub use conflict::ConflictPayload;
pub use note::{
    extract_summary, extract_tags, extract_title, Note, NoteChanges, NoteId, NoteSummary,
    Permission, RevisionId, RevisionedSnapshot, NO_SUMMARY, UNTITLED,
};
pub use settings::UserSettings;
