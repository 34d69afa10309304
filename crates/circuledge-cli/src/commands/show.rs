use circuledge_core::workflow::NoteTransport;

use crate::commands::common::{channel_label, connect, format_timestamp, resolve_note_id};
use crate::error::CliError;

pub async fn run_show(id: &str, as_json: bool, server: &str) -> Result<(), CliError> {
    let client = connect(server)?;
    let note_id = resolve_note_id(id, &client).await?;
    let snapshot = client
        .read_note(&note_id)
        .await?
        .ok_or_else(|| CliError::NoteNotFound(note_id.to_string()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    let channels = client.channels().await?;
    println!("id:         {note_id}");
    println!("revision:   {}", snapshot.revision);
    println!("channel:    {}", channel_label(&channels, snapshot.channel));
    println!("permission: {}", snapshot.permission);
    println!("updated:    {}", format_timestamp(snapshot.updated_at));
    println!();
    println!("{}", snapshot.body);
    Ok(())
}
