//! Transport seam between the edit workflow and a note server

use async_trait::async_trait;

use crate::conflict::{ConflictDetector, SubmitOutcome};
use crate::error::Result;
use crate::models::{ConflictPayload, NoteId, RevisionedSnapshot};
use crate::store::RevisionStore;
use crate::wire::UpdateNoteRequest;

/// Logical result of an update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Accepted; the note now carries a new revision
    Saved,
    /// Base revision was stale
    Conflict(ConflictPayload),
    /// Target note does not exist
    Missing,
}

/// Carries reads and updates to wherever notes live.
///
/// Implementations report transport failures as `Error::Unavailable` and
/// rejected input as `Error::Malformed`; conflicts and missing notes are
/// ordinary values.
#[async_trait]
pub trait NoteTransport: Send + Sync {
    /// Fetch the current snapshot, `None` if the note does not exist
    async fn read_note(&self, id: &NoteId) -> Result<Option<RevisionedSnapshot>>;

    /// Submit an update based on `request.revision`
    async fn update_note(&self, id: &NoteId, request: &UpdateNoteRequest) -> Result<SaveOutcome>;
}

/// In-process transport talking straight to a [`ConflictDetector`]
pub struct LocalTransport<S> {
    detector: ConflictDetector<S>,
}

impl<S: RevisionStore> LocalTransport<S> {
    pub const fn new(detector: ConflictDetector<S>) -> Self {
        Self { detector }
    }

    pub const fn detector(&self) -> &ConflictDetector<S> {
        &self.detector
    }
}

#[async_trait]
impl<S: RevisionStore> NoteTransport for LocalTransport<S> {
    async fn read_note(&self, id: &NoteId) -> Result<Option<RevisionedSnapshot>> {
        Ok(self.detector.store().read(id).map(|note| note.snapshot()))
    }

    async fn update_note(&self, id: &NoteId, request: &UpdateNoteRequest) -> Result<SaveOutcome> {
        Ok(match self.detector.submit_update(id, request)? {
            SubmitOutcome::Saved(_) => SaveOutcome::Saved,
            SubmitOutcome::Conflict(payload) => SaveOutcome::Conflict(payload),
            SubmitOutcome::NotFound => SaveOutcome::Missing,
        })
    }
}
