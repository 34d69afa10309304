use crate::commands::common::{connect, resolve_note_id};
use crate::error::CliError;

pub async fn run_delete(id: &str, server: &str) -> Result<(), CliError> {
    let client = connect(server)?;
    let note_id = resolve_note_id(id, &client).await?;

    if !client.delete_note(&note_id).await? {
        return Err(CliError::NoteNotFound(note_id.to_string()));
    }
    println!("{note_id}");
    Ok(())
}
