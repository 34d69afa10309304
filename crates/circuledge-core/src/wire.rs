//! Request and response bodies shared by the API server and its clients

use serde::{Deserialize, Serialize};

use crate::models::{ChannelId, Note, NoteChanges, NoteId, NoteSummary, Permission, RevisionId};
use crate::store::Page;

/// `PUT /api/notes/{id}` body: full replacement values plus the edit base
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    /// Revision the caller started editing from
    pub revision: RevisionId,
    pub channel: ChannelId,
    pub permission: Permission,
    pub body: String,
}

impl UpdateNoteRequest {
    /// Field values to store when the revision matches
    #[must_use]
    pub fn changes(&self) -> NoteChanges {
        NoteChanges {
            channel: self.channel,
            permission: self.permission,
            body: self.body.clone(),
        }
    }
}

/// `POST /api/notes` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedNote {
    pub id: NoteId,
    pub channel: ChannelId,
    pub permission: Permission,
    pub revision: RevisionId,
}

impl From<&Note> for CreatedNote {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id,
            channel: note.channel,
            permission: note.permission,
            revision: note.revision,
        }
    }
}

/// `GET /api/notes` and `GET /api/me/history` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteList {
    /// Matches before pagination
    pub total: usize,
    pub notes: Vec<NoteSummary>,
}

impl From<Page<NoteSummary>> for NoteList {
    fn from(page: Page<NoteSummary>) -> Self {
        Self {
            total: page.total,
            notes: page.items,
        }
    }
}

/// `GET /api/me/history` query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_wire_shape() {
        let payload = format!(
            r#"{{"revision":"{}","channel":"{}","permission":"limited","body":"a\nb"}}"#,
            RevisionId::new(),
            ChannelId::new()
        );
        let request: UpdateNoteRequest = serde_json::from_str(&payload).unwrap();
        assert_eq!(request.permission, Permission::Limited);
        assert_eq!(request.changes().body, "a\nb");
    }

    #[test]
    fn update_request_requires_revision() {
        let payload = format!(
            r#"{{"channel":"{}","permission":"public","body":""}}"#,
            ChannelId::new()
        );
        let error = serde_json::from_str::<UpdateNoteRequest>(&payload).unwrap_err();
        assert!(error.to_string().contains("revision"));
    }
}
