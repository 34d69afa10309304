use circuledge_core::store::NoteQuery;

use crate::cli::SortArg;
use crate::commands::common::{
    connect, find_channel_by_path, format_note_lines, note_to_list_item, NoteListItem,
};
use crate::error::CliError;

pub struct ListOptions {
    pub limit: usize,
    pub offset: usize,
    pub channel: Option<String>,
    pub tag: Vec<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub sort: SortArg,
    pub json: bool,
}

pub async fn run_list(options: ListOptions, server: &str) -> Result<(), CliError> {
    let client = connect(server)?;
    let channels = client.channels().await?;
    let channel = options
        .channel
        .as_deref()
        .map(|path| find_channel_by_path(&channels, path).map(|channel| channel.id))
        .transpose()?;

    let query = NoteQuery {
        channel,
        tag: options.tag,
        title: options.title,
        body: options.body,
        sort: options.sort.into(),
        limit: Some(options.limit),
        offset: options.offset,
    };
    let page = client.list_notes(&query).await?;

    if options.json {
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
        if page.total > page.notes.len() {
            println!("({} of {} notes)", page.notes.len(), page.total);
        }
    }

    Ok(())
}
