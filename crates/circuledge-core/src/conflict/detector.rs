//! Conflict detection logic.
//!
//! Wraps the store's compare-and-swap update. A stale base revision yields a
//! [`ConflictPayload`] with a diff of the server body against the submitted
//! body; nothing is merged or retried on the caller's behalf.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::ConflictTestConfig;
use crate::diff::conflict_diff;
use crate::error::{Error, Result};
use crate::models::{ConflictPayload, Note, NoteChanges, NoteId};
use crate::store::{RevisionStore, UpdateOutcome};
use crate::wire::UpdateNoteRequest;

/// Outcome of a submitted update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stored; carries the note with its new revision
    Saved(Note),
    /// The base revision was stale
    Conflict(ConflictPayload),
    /// No note with that id
    NotFound,
}

/// Revision-checked update entry point over a [`RevisionStore`].
pub struct ConflictDetector<S> {
    store: Arc<S>,
    conflict_test: ConflictTestConfig,
}

impl<S> Clone for ConflictDetector<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            conflict_test: self.conflict_test.clone(),
        }
    }
}

impl<S: RevisionStore> ConflictDetector<S> {
    pub const fn new(store: Arc<S>, conflict_test: ConflictTestConfig) -> Self {
        Self {
            store,
            conflict_test,
        }
    }

    /// The underlying store
    pub const fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Submit an update based on `request.revision`.
    ///
    /// Conflicts and missing notes are outcomes, not errors. The only error
    /// is [`Error::Malformed`] for a request naming an unknown channel.
    pub fn submit_update(&self, id: &NoteId, request: &UpdateNoteRequest) -> Result<SubmitOutcome> {
        if self.store.channel(&request.channel).is_none() {
            return Err(Error::Malformed(format!(
                "unknown channel: {}",
                request.channel
            )));
        }

        self.perturb_conflict_test_note(id);

        match self.store.update(id, request.revision, request.changes()) {
            UpdateOutcome::Updated(note) => {
                debug!(note = %id, revision = %note.revision, "Accepted update");
                Ok(SubmitOutcome::Saved(note))
            }
            UpdateOutcome::Conflict(current) => {
                let diff = conflict_diff(&current.body, &request.body);
                warn!(
                    note = %id,
                    base = %request.revision,
                    latest = %current.revision,
                    diff_lines = diff.lines().count(),
                    "Update conflicts with a newer revision"
                );
                Ok(SubmitOutcome::Conflict(ConflictPayload::from_current(
                    &current, diff,
                )))
            }
            UpdateOutcome::NotFound => Ok(SubmitOutcome::NotFound),
        }
    }

    /// Simulate a concurrent edit on notes in the always-conflict channel
    fn perturb_conflict_test_note(&self, id: &NoteId) {
        if !self.conflict_test.enabled {
            return;
        }
        let Some(current) = self.store.peek(id) else {
            return;
        };
        let in_test_channel = self
            .store
            .channel(&current.channel)
            .is_some_and(|channel| channel.has_path(&self.conflict_test.channel_path));
        if !in_test_channel {
            return;
        }

        let changes = NoteChanges {
            channel: current.channel,
            permission: current.permission,
            body: format!("{}{}", current.body, self.conflict_test.marker),
        };
        match self.store.update(id, current.revision, changes) {
            UpdateOutcome::Updated(perturbed) => debug!(
                note = %id,
                revision = %perturbed.revision,
                "Perturbed note in conflict test channel"
            ),
            // Someone else moved the note on; the submission conflicts anyway
            UpdateOutcome::Conflict(_) | UpdateOutcome::NotFound => {}
        }
    }
}
