//! Client-side edit workflow.
//!
//! Tracks the revision an edit started from, submits edits, and holds
//! conflict payloads until the user discards or resubmits. Each state carries
//! only the data valid in it, so a conflicted workflow always has a payload
//! and the user's text.
//!
//! Submission is split into [`ConflictWorkflow::begin_submit`] and
//! [`ConflictWorkflow::complete_submit`] so a caller can drive the transport
//! itself. The ticket handed out by `begin_submit` is checked on completion;
//! responses that arrive after the session was abandoned or replaced are
//! dropped.

mod transport;

pub use transport::{LocalTransport, NoteTransport, SaveOutcome};

use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::models::{
    ChannelId, ConflictPayload, NoteId, Permission, RevisionId, RevisionedSnapshot,
};
use crate::wire::UpdateNoteRequest;

/// Workflow misuse
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("No note is being edited")]
    NoSession,

    #[error("A save is already in flight")]
    SubmitInFlight,

    #[error("There is no conflict to resolve")]
    NoConflict,

    #[error("The current conflict must be resolved first")]
    UnresolvedConflict,

    #[error("Received a conflict without a base revision")]
    MissingBaseRevision,

    #[error("The open note has unsaved changes")]
    UnsavedChanges,
}

/// An open edit of one note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub note_id: NoteId,
    /// Snapshot the edit started from
    pub base: RevisionedSnapshot,
    /// In-progress body
    pub body: String,
    pub channel: ChannelId,
    pub permission: Permission,
}

impl EditSession {
    pub fn new(note_id: NoteId, base: RevisionedSnapshot) -> Self {
        Self {
            note_id,
            body: base.body.clone(),
            channel: base.channel,
            permission: base.permission,
            base,
        }
    }

    /// Whether any field differs from the base snapshot
    pub fn is_dirty(&self) -> bool {
        self.body != self.base.body
            || self.channel != self.base.channel
            || self.permission != self.base.permission
    }

    fn request(&self, expected: RevisionId) -> UpdateNoteRequest {
        UpdateNoteRequest {
            revision: expected,
            channel: self.channel,
            permission: self.permission,
            body: self.body.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    Editing(EditSession),
    Submitting {
        session: EditSession,
        expected: RevisionId,
        /// Conflict being resolved by this submission, restored on failure
        pending_conflict: Option<ConflictPayload>,
    },
    Conflicted {
        session: EditSession,
        conflict: ConflictPayload,
    },
}

impl WorkflowState {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Editing(_) => "editing",
            Self::Submitting { .. } => "submitting",
            Self::Conflicted { .. } => "conflicted",
        }
    }
}

/// Handed out when a submission starts; required to complete it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
    pub note_id: NoteId,
    pub request: UpdateNoteRequest,
}

/// What a finished submission did to the workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Stored; the session is closed
    Saved(NoteId),
    /// Now in `Conflicted` with this payload
    Conflict(ConflictPayload),
    /// Prior state restored; the message is also kept in `last_error`
    Failed(String),
    /// Response belonged to an abandoned or replaced submission
    Dropped,
}

#[derive(Debug, Default)]
pub struct ConflictWorkflow {
    state: WorkflowState,
    generation: u64,
    last_error: Option<String>,
}

impl ConflictWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub const fn is_submitting(&self) -> bool {
        matches!(self.state, WorkflowState::Submitting { .. })
    }

    /// The open session in any non-idle state
    pub const fn session(&self) -> Option<&EditSession> {
        match &self.state {
            WorkflowState::Idle => None,
            WorkflowState::Editing(session)
            | WorkflowState::Submitting { session, .. }
            | WorkflowState::Conflicted { session, .. } => Some(session),
        }
    }

    /// The unresolved conflict, if any
    pub const fn conflict(&self) -> Option<&ConflictPayload> {
        match &self.state {
            WorkflowState::Conflicted { conflict, .. } => Some(conflict),
            _ => None,
        }
    }

    /// Start editing from `snapshot`, replacing any clean session.
    ///
    /// A session with unsaved changes must be saved or abandoned first.
    pub fn open(&mut self, note_id: NoteId, snapshot: RevisionedSnapshot) -> Result<()> {
        self.ensure_can_open()?;
        self.generation += 1;
        self.last_error = None;
        debug!(note = %note_id, revision = %snapshot.revision, "Opened edit session");
        self.state = WorkflowState::Editing(EditSession::new(note_id, snapshot));
        Ok(())
    }

    pub fn set_body(&mut self, body: impl Into<String>) -> Result<()> {
        self.editable_session()?.body = body.into();
        Ok(())
    }

    pub fn set_permission(&mut self, permission: Permission) -> Result<()> {
        self.editable_session()?.permission = permission;
        Ok(())
    }

    /// `Editing` to `Submitting` against the session's base revision
    pub fn begin_submit(&mut self) -> Result<SubmitTicket> {
        match std::mem::take(&mut self.state) {
            WorkflowState::Editing(session) => {
                let expected = session.base.revision;
                Ok(self.enter_submitting(session, expected, None))
            }
            other => Err(self.restore_with_error(other).into()),
        }
    }

    /// `Conflicted` to `Submitting` against a caller-chosen revision
    pub fn resubmit(&mut self, expected: RevisionId) -> Result<SubmitTicket> {
        match std::mem::take(&mut self.state) {
            WorkflowState::Conflicted { session, conflict } => {
                Ok(self.enter_submitting(session, expected, Some(conflict)))
            }
            other => {
                let error = match &other {
                    WorkflowState::Editing(_) => WorkflowError::NoConflict,
                    _ => Self::misuse(&other),
                };
                self.state = other;
                Err(error.into())
            }
        }
    }

    /// Resubmit the user's text against the conflict's latest revision
    pub fn resubmit_latest(&mut self) -> Result<SubmitTicket> {
        let latest = self
            .conflict()
            .map(|conflict| conflict.latest_revision)
            .ok_or(WorkflowError::NoConflict);
        match latest {
            Ok(latest) => self.resubmit(latest),
            Err(WorkflowError::NoConflict) if self.is_submitting() => {
                Err(WorkflowError::SubmitInFlight.into())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Apply a transport response to the submission `ticket` started
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        response: Result<SaveOutcome>,
    ) -> Completion {
        if ticket.generation != self.generation || !self.is_submitting() {
            warn!(
                note = %ticket.note_id,
                state = self.state.name(),
                "Dropping response for a stale submission"
            );
            return Completion::Dropped;
        }
        let WorkflowState::Submitting {
            session,
            pending_conflict,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return Completion::Dropped;
        };

        match response {
            Ok(SaveOutcome::Saved) => {
                debug!(note = %session.note_id, "Saved edit");
                self.last_error = None;
                Completion::Saved(session.note_id)
            }
            Ok(SaveOutcome::Conflict(conflict)) => {
                warn!(
                    note = %session.note_id,
                    latest = %conflict.latest_revision,
                    "Save conflicted with a newer revision"
                );
                self.state = WorkflowState::Conflicted {
                    session,
                    conflict: conflict.clone(),
                };
                Completion::Conflict(conflict)
            }
            Ok(SaveOutcome::Missing) => {
                let message = Error::NotFound(session.note_id.to_string()).to_string();
                self.fail(session, pending_conflict, message)
            }
            Err(error) => self.fail(session, pending_conflict, error.to_string()),
        }
    }

    /// Clear the conflict and keep editing the user's text
    pub fn discard(&mut self) -> Result<()> {
        match std::mem::take(&mut self.state) {
            WorkflowState::Conflicted { session, .. } => {
                self.state = WorkflowState::Editing(session);
                Ok(())
            }
            other => {
                let error = match &other {
                    WorkflowState::Submitting { .. } => WorkflowError::SubmitInFlight,
                    _ => WorkflowError::NoConflict,
                };
                self.state = other;
                Err(error.into())
            }
        }
    }

    /// Drop the session; late responses for it will be ignored
    pub fn abandon(&mut self) -> Option<EditSession> {
        self.generation += 1;
        self.last_error = None;
        match std::mem::take(&mut self.state) {
            WorkflowState::Idle => None,
            WorkflowState::Editing(session)
            | WorkflowState::Submitting { session, .. }
            | WorkflowState::Conflicted { session, .. } => Some(session),
        }
    }

    /// Take a conflict delivered outside a submission; the latest one wins
    pub fn record_conflict(&mut self, conflict: ConflictPayload) -> Result<()> {
        match std::mem::take(&mut self.state) {
            WorkflowState::Editing(session) | WorkflowState::Conflicted { session, .. } => {
                self.state = WorkflowState::Conflicted { session, conflict };
                Ok(())
            }
            WorkflowState::Idle => Err(WorkflowError::MissingBaseRevision.into()),
            other @ WorkflowState::Submitting { .. } => {
                self.state = other;
                Err(WorkflowError::SubmitInFlight.into())
            }
        }
    }

    /// Read the note and open a session on it
    pub async fn start_editing<T>(&mut self, transport: &T, note_id: NoteId) -> Result<()>
    where
        T: NoteTransport + ?Sized,
    {
        self.ensure_can_open()?;
        let snapshot = transport
            .read_note(&note_id)
            .await?
            .ok_or_else(|| Error::NotFound(note_id.to_string()))?;
        self.open(note_id, snapshot)
    }

    /// Submit the open session and apply the response.
    ///
    /// On success the note is re-read and a fresh session opened on it. If
    /// that read fails the workflow stays idle with `last_error` set.
    pub async fn save<T>(&mut self, transport: &T) -> Result<Completion>
    where
        T: NoteTransport + ?Sized,
    {
        let ticket = self.begin_submit()?;
        Ok(self.drive(transport, ticket).await)
    }

    /// Resubmit a conflicted session against its latest revision
    pub async fn retry_latest<T>(&mut self, transport: &T) -> Result<Completion>
    where
        T: NoteTransport + ?Sized,
    {
        let ticket = self.resubmit_latest()?;
        Ok(self.drive(transport, ticket).await)
    }

    async fn drive<T>(&mut self, transport: &T, ticket: SubmitTicket) -> Completion
    where
        T: NoteTransport + ?Sized,
    {
        let response = transport.update_note(&ticket.note_id, &ticket.request).await;
        let completion = self.complete_submit(ticket, response);
        if let Completion::Saved(note_id) = &completion {
            self.refresh(transport, *note_id).await;
        }
        completion
    }

    async fn refresh<T>(&mut self, transport: &T, note_id: NoteId)
    where
        T: NoteTransport + ?Sized,
    {
        match transport.read_note(&note_id).await {
            Ok(Some(snapshot)) => {
                // Idle after a save, so opening cannot fail
                if let Err(error) = self.open(note_id, snapshot) {
                    self.last_error = Some(error.to_string());
                }
            }
            Ok(None) => self.last_error = Some(Error::NotFound(note_id.to_string()).to_string()),
            Err(error) => self.last_error = Some(error.to_string()),
        }
    }

    fn enter_submitting(
        &mut self,
        session: EditSession,
        expected: RevisionId,
        pending_conflict: Option<ConflictPayload>,
    ) -> SubmitTicket {
        self.generation += 1;
        self.last_error = None;
        let ticket = SubmitTicket {
            generation: self.generation,
            note_id: session.note_id,
            request: session.request(expected),
        };
        self.state = WorkflowState::Submitting {
            session,
            expected,
            pending_conflict,
        };
        ticket
    }

    fn fail(
        &mut self,
        session: EditSession,
        pending_conflict: Option<ConflictPayload>,
        message: String,
    ) -> Completion {
        warn!(note = %session.note_id, error = %message, "Save failed");
        self.state = match pending_conflict {
            Some(conflict) => WorkflowState::Conflicted { session, conflict },
            None => WorkflowState::Editing(session),
        };
        self.last_error = Some(message.clone());
        Completion::Failed(message)
    }

    fn ensure_can_open(&self) -> Result<()> {
        match &self.state {
            WorkflowState::Editing(session) if session.is_dirty() => {
                Err(WorkflowError::UnsavedChanges.into())
            }
            WorkflowState::Idle | WorkflowState::Editing(_) => Ok(()),
            WorkflowState::Submitting { .. } => Err(WorkflowError::SubmitInFlight.into()),
            WorkflowState::Conflicted { .. } => Err(WorkflowError::UnresolvedConflict.into()),
        }
    }

    fn editable_session(&mut self) -> Result<&mut EditSession> {
        match &mut self.state {
            WorkflowState::Editing(session) | WorkflowState::Conflicted { session, .. } => {
                Ok(session)
            }
            WorkflowState::Submitting { .. } => Err(WorkflowError::SubmitInFlight.into()),
            WorkflowState::Idle => Err(WorkflowError::NoSession.into()),
        }
    }

    fn restore_with_error(&mut self, state: WorkflowState) -> WorkflowError {
        let error = Self::misuse(&state);
        self.state = state;
        error
    }

    const fn misuse(state: &WorkflowState) -> WorkflowError {
        match state {
            WorkflowState::Idle => WorkflowError::NoSession,
            WorkflowState::Submitting { .. } => WorkflowError::SubmitInFlight,
            WorkflowState::Conflicted { .. } => WorkflowError::UnresolvedConflict,
            WorkflowState::Editing(_) => WorkflowError::NoConflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::{ConflictTestConfig, StoreConfig};
    use crate::conflict::ConflictDetector;
    use crate::models::{Note, NoteChanges};
    use crate::store::{MemoryStore, RevisionStore, UpdateOutcome};

    fn local() -> LocalTransport<MemoryStore> {
        let store = Arc::new(MemoryStore::new(StoreConfig::default()));
        LocalTransport::new(ConflictDetector::new(store, ConflictTestConfig::default()))
    }

    fn external_update(transport: &LocalTransport<MemoryStore>, note: &Note, body: &str) -> Note {
        match transport.detector().store().update(
            &note.id,
            note.revision,
            NoteChanges {
                channel: note.channel,
                permission: note.permission,
                body: body.to_string(),
            },
        ) {
            UpdateOutcome::Updated(note) => note,
            other => panic!("external update failed: {other:?}"),
        }
    }

    struct Offline;

    #[async_trait]
    impl NoteTransport for Offline {
        async fn read_note(&self, _id: &NoteId) -> Result<Option<RevisionedSnapshot>> {
            Err(Error::Unavailable("connection refused".to_string()))
        }

        async fn update_note(
            &self,
            _id: &NoteId,
            _request: &UpdateNoteRequest,
        ) -> Result<SaveOutcome> {
            Err(Error::Unavailable("connection refused".to_string()))
        }
    }

    fn workflow_error(result: Result<impl std::fmt::Debug>) -> WorkflowError {
        match result {
            Err(Error::Workflow(error)) => error,
            other => panic!("expected workflow error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn save_returns_to_editing_with_fresh_revision() {
        let transport = local();
        let note = transport.detector().store().create();
        let mut workflow = ConflictWorkflow::new();

        workflow.start_editing(&transport, note.id).await.unwrap();
        assert_eq!(workflow.session().unwrap().base.revision, note.revision);

        workflow.set_body("new").unwrap();
        let completion = workflow.save(&transport).await.unwrap();
        assert_eq!(completion, Completion::Saved(note.id));

        let session = workflow.session().unwrap();
        assert_ne!(session.base.revision, note.revision);
        assert_eq!(session.body, "new");
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn read_then_conflict_keeps_user_text() {
        let transport = local();
        let created = transport.detector().store().create();
        let r1 = external_update(&transport, &created, "line1\nline2");

        let mut workflow = ConflictWorkflow::new();
        workflow.start_editing(&transport, r1.id).await.unwrap();
        let r2 = external_update(&transport, &r1, "line1\nline2\nline3");

        workflow.set_body("line1\nlineX").unwrap();
        let Completion::Conflict(payload) = workflow.save(&transport).await.unwrap() else {
            panic!("expected conflict");
        };
        assert_eq!(payload.latest_revision, r2.revision);
        assert_eq!(payload.diff, "- line2\n- line3\n+ lineX");

        assert_eq!(workflow.conflict(), Some(&payload));
        assert_eq!(workflow.session().unwrap().body, "line1\nlineX");
        assert_eq!(workflow.session().unwrap().base.revision, r1.revision);
    }

    #[tokio::test]
    async fn retry_against_latest_revision_saves() {
        let transport = local();
        let note = transport.detector().store().create();
        let mut workflow = ConflictWorkflow::new();
        workflow.start_editing(&transport, note.id).await.unwrap();
        external_update(&transport, &note, "theirs");

        workflow.set_body("mine").unwrap();
        assert!(matches!(
            workflow.save(&transport).await.unwrap(),
            Completion::Conflict(_)
        ));

        let completion = workflow.retry_latest(&transport).await.unwrap();
        assert_eq!(completion, Completion::Saved(note.id));
        assert_eq!(
            transport.detector().store().peek(&note.id).unwrap().body,
            "mine"
        );
    }

    #[tokio::test]
    async fn discard_returns_to_editing_with_text_intact() {
        let transport = local();
        let note = transport.detector().store().create();
        let mut workflow = ConflictWorkflow::new();
        workflow.start_editing(&transport, note.id).await.unwrap();
        external_update(&transport, &note, "theirs");
        workflow.set_body("mine").unwrap();
        workflow.save(&transport).await.unwrap();

        assert_eq!(
            workflow_error(workflow.start_editing(&transport, note.id).await),
            WorkflowError::UnresolvedConflict
        );

        workflow.discard().unwrap();
        assert!(matches!(workflow.state(), WorkflowState::Editing(_)));
        assert_eq!(workflow.session().unwrap().body, "mine");
        assert_eq!(workflow_error(workflow.discard()), WorkflowError::NoConflict);
    }

    #[tokio::test]
    async fn reopening_keeps_unsaved_text() {
        let transport = local();
        let note = transport.detector().store().create();
        let mut workflow = ConflictWorkflow::new();
        workflow.start_editing(&transport, note.id).await.unwrap();
        workflow.start_editing(&transport, note.id).await.unwrap();

        workflow.set_body("unsaved user text").unwrap();
        assert_eq!(
            workflow_error(workflow.start_editing(&transport, note.id).await),
            WorkflowError::UnsavedChanges
        );
        assert_eq!(workflow.session().unwrap().body, "unsaved user text");

        workflow.abandon();
        workflow.start_editing(&transport, note.id).await.unwrap();
        assert_eq!(workflow.session().unwrap().body, note.body);
    }

    #[tokio::test]
    async fn transport_failure_keeps_prior_state() {
        let transport = local();
        let note = transport.detector().store().create();
        let mut workflow = ConflictWorkflow::new();
        workflow.start_editing(&transport, note.id).await.unwrap();
        workflow.set_body("unsent").unwrap();

        let completion = workflow.save(&Offline).await.unwrap();
        assert!(matches!(completion, Completion::Failed(_)));
        assert!(matches!(workflow.state(), WorkflowState::Editing(_)));
        assert_eq!(workflow.session().unwrap().body, "unsent");
        assert!(workflow.last_error().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn failed_resubmit_restores_conflict() {
        let transport = local();
        let note = transport.detector().store().create();
        let mut workflow = ConflictWorkflow::new();
        workflow.start_editing(&transport, note.id).await.unwrap();
        external_update(&transport, &note, "theirs");
        workflow.set_body("mine").unwrap();
        let Completion::Conflict(payload) = workflow.save(&transport).await.unwrap() else {
            panic!("expected conflict");
        };

        let completion = workflow.retry_latest(&Offline).await.unwrap();
        assert!(matches!(completion, Completion::Failed(_)));
        assert_eq!(workflow.conflict(), Some(&payload));
    }

    #[tokio::test]
    async fn deleted_note_is_reported_without_losing_session() {
        let transport = local();
        let note = transport.detector().store().create();
        let mut workflow = ConflictWorkflow::new();
        workflow.start_editing(&transport, note.id).await.unwrap();
        transport.detector().store().delete(&note.id);

        let completion = workflow.save(&transport).await.unwrap();
        assert!(matches!(completion, Completion::Failed(_)));
        assert!(workflow.session().is_some());
        assert!(workflow.last_error().unwrap().contains("not found"));
    }

    #[tokio::test]
    async fn start_editing_missing_note_is_not_found() {
        let transport = local();
        let mut workflow = ConflictWorkflow::new();

        let error = workflow
            .start_editing(&transport, NoteId::new())
            .await
            .unwrap_err();
        assert!(matches!(error, Error::NotFound(_)));
        assert_eq!(workflow.state(), &WorkflowState::Idle);
    }

    #[test]
    fn second_submit_while_in_flight_is_rejected() {
        let note = Note::new(ChannelId::new(), Permission::Private, "a");
        let mut workflow = ConflictWorkflow::new();
        workflow.open(note.id, note.snapshot()).unwrap();

        let ticket = workflow.begin_submit().unwrap();
        assert_eq!(ticket.request.revision, note.revision);
        assert_eq!(
            workflow_error(workflow.begin_submit()),
            WorkflowError::SubmitInFlight
        );
        assert_eq!(
            workflow_error(workflow.set_body("b")),
            WorkflowError::SubmitInFlight
        );
        assert!(workflow.is_submitting());

        assert_eq!(
            workflow.complete_submit(ticket, Ok(SaveOutcome::Saved)),
            Completion::Saved(note.id)
        );
        assert_eq!(workflow.state(), &WorkflowState::Idle);
    }

    #[test]
    fn late_response_after_abandon_is_dropped() {
        let note = Note::new(ChannelId::new(), Permission::Private, "a");
        let other = Note::new(ChannelId::new(), Permission::Private, "b");
        let mut workflow = ConflictWorkflow::new();
        workflow.open(note.id, note.snapshot()).unwrap();
        let ticket = workflow.begin_submit().unwrap();

        let abandoned = workflow.abandon().unwrap();
        assert_eq!(abandoned.note_id, note.id);
        workflow.open(other.id, other.snapshot()).unwrap();

        let payload = ConflictPayload::from_current(&note, "- a\n+ c".to_string());
        assert_eq!(
            workflow.complete_submit(ticket, Ok(SaveOutcome::Conflict(payload))),
            Completion::Dropped
        );
        assert_eq!(workflow.session().unwrap().note_id, other.id);
        assert!(workflow.conflict().is_none());
    }

    #[test]
    fn conflict_without_base_revision_is_an_error() {
        let note = Note::new(ChannelId::new(), Permission::Private, "a");
        let payload = ConflictPayload::from_current(&note, "- a\n+ b".to_string());
        let mut workflow = ConflictWorkflow::new();

        assert_eq!(
            workflow_error(workflow.record_conflict(payload)),
            WorkflowError::MissingBaseRevision
        );
    }

    #[test]
    fn latest_conflict_overwrites_previous() {
        let note = Note::new(ChannelId::new(), Permission::Private, "a");
        let mut workflow = ConflictWorkflow::new();
        workflow.open(note.id, note.snapshot()).unwrap();
        workflow.set_body("mine").unwrap();

        let first = ConflictPayload::from_current(&note, "- a\n+ mine".to_string());
        let second = ConflictPayload::from_current(&note, "- b\n+ mine".to_string());
        workflow.record_conflict(first).unwrap();
        workflow.record_conflict(second.clone()).unwrap();

        assert_eq!(workflow.conflict(), Some(&second));
        assert_eq!(workflow.session().unwrap().body, "mine");
    }

    #[test]
    fn idle_workflow_rejects_edits() {
        let mut workflow = ConflictWorkflow::new();
        assert_eq!(workflow_error(workflow.set_body("x")), WorkflowError::NoSession);
        assert_eq!(workflow_error(workflow.begin_submit()), WorkflowError::NoSession);
        assert_eq!(
            workflow_error(workflow.resubmit_latest()),
            WorkflowError::NoConflict
        );
        assert!(workflow.abandon().is_none());
    }
}
