use std::path::{Path, PathBuf};

use circuledge_core::models::NoteId;
use circuledge_core::workflow::{Completion, ConflictWorkflow, NoteTransport, WorkflowError};

use crate::commands::common::{
    capture_editor_input_with_initial, connect, format_conflict_report, prompt_resolution,
    resolve_note_id, write_recovery_file, Resolution,
};
use crate::error::CliError;

pub async fn run_edit(id: &str, server: &str) -> Result<(), CliError> {
    let client = connect(server)?;
    let note_id = resolve_note_id(id, &client).await?;

    let mut workflow = ConflictWorkflow::new();
    workflow.start_editing(&client, note_id).await?;
    let initial = session_body(&workflow)?;

    let Some(edited_content) = capture_editor_input_with_initial(&initial)? else {
        workflow.abandon();
        return Err(CliError::EmptyEditedContent);
    };

    if edited_content == initial {
        println!("{note_id}");
        return Ok(());
    }

    workflow.set_body(edited_content)?;
    let completion = workflow.save(&client).await?;
    settle_save(&mut workflow, &client, completion, |_| prompt_resolution()).await
}

/// Drive a submitted save to an end state, asking `choose` how to resolve
/// each conflict.
///
/// The edited text is written to a recovery file before `choose` runs and
/// removed again once a save lands. `choose` is given that file's path.
pub async fn settle_save<T, F>(
    workflow: &mut ConflictWorkflow,
    transport: &T,
    mut completion: Completion,
    mut choose: F,
) -> Result<(), CliError>
where
    T: NoteTransport + ?Sized,
    F: FnMut(&Path) -> Result<Resolution, CliError>,
{
    let mut unsaved = session_text(workflow);
    let mut recovery: Option<PathBuf> = None;

    loop {
        match completion {
            Completion::Saved(note_id) => {
                if let Some(path) = recovery.take() {
                    let _ = std::fs::remove_file(path);
                }
                if let Some(warning) = workflow.last_error() {
                    tracing::warn!(note = %note_id, "Saved, but could not refresh: {warning}");
                }
                println!("{note_id}");
                return Ok(());
            }
            Completion::Conflict(conflict) => {
                let (note_id, body) = session_text(workflow)
                    .ok_or(circuledge_core::Error::from(WorkflowError::NoSession))?;
                unsaved = Some((note_id, body.clone()));
                let path = write_recovery_file(note_id, &body)?;
                if let Some(previous) = recovery.replace(path.clone()) {
                    let _ = std::fs::remove_file(previous);
                }

                let server_body = transport
                    .read_note(&note_id)
                    .await
                    .ok()
                    .flatten()
                    .map(|snapshot| snapshot.body);
                eprintln!(
                    "{}",
                    format_conflict_report(&conflict, server_body.as_deref(), &path)
                );

                completion = match choose(&path)? {
                    Resolution::Retry => workflow.retry_latest(transport).await?,
                    Resolution::Edit => {
                        let Some(edited) = capture_editor_input_with_initial(&body)? else {
                            workflow.abandon();
                            return Err(CliError::UnresolvedConflict(path));
                        };
                        workflow.set_body(edited)?;
                        workflow.retry_latest(transport).await?
                    }
                    Resolution::Discard => {
                        workflow.discard()?;
                        workflow.abandon();
                        return Err(CliError::UnresolvedConflict(path));
                    }
                };
            }
            Completion::Failed(message) => {
                if let Some(current) = session_text(workflow) {
                    unsaved = Some(current);
                }
                let path = keep_unsaved(recovery.take(), unsaved.as_ref())?;
                workflow.abandon();
                return Err(CliError::SaveFailed {
                    message,
                    recovery: path,
                });
            }
            Completion::Dropped => {
                let path = keep_unsaved(recovery.take(), unsaved.as_ref())?;
                return Err(CliError::SaveFailed {
                    message: "the response arrived after the edit was abandoned".to_string(),
                    recovery: path,
                });
            }
        }
    }
}

fn keep_unsaved(
    recovery: Option<PathBuf>,
    unsaved: Option<&(NoteId, String)>,
) -> Result<PathBuf, CliError> {
    match (recovery, unsaved) {
        (Some(path), _) => Ok(path),
        (None, Some((note_id, body))) => write_recovery_file(*note_id, body),
        (None, None) => Err(circuledge_core::Error::from(WorkflowError::NoSession).into()),
    }
}

fn session_text(workflow: &ConflictWorkflow) -> Option<(NoteId, String)> {
    workflow
        .session()
        .map(|session| (session.note_id, session.body.clone()))
}

fn session_body(workflow: &ConflictWorkflow) -> Result<String, CliError> {
    workflow
        .session()
        .map(|session| session.body.clone())
        .ok_or_else(|| circuledge_core::Error::from(WorkflowError::NoSession).into())
}
