use circuledge_core::wire::HistoryQuery;

use crate::commands::common::{connect, format_note_lines, note_to_list_item, NoteListItem};
use crate::error::CliError;

pub async fn run_history(
    limit: Option<usize>,
    offset: usize,
    as_json: bool,
    server: &str,
) -> Result<(), CliError> {
    let client = connect(server)?;
    let channels = client.channels().await?;
    let page = client.history(&HistoryQuery { limit, offset }).await?;

    if as_json {
        let items = page
            .notes
            .iter()
            .map(|note| note_to_list_item(note, &channels))
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        for line in format_note_lines(&page.notes, &channels) {
            println!("{line}");
        }
    }
    Ok(())
}
