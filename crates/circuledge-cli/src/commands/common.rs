use std::env;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use circuledge_core::models::{Channel, ChannelId, ConflictPayload, NoteId, NoteSummary};
use circuledge_core::store::NoteQuery;
use circuledge_core::util::normalize_base_url;
use serde::Serialize;

use crate::error::CliError;
use crate::http::HttpClient;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub channel: String,
    pub permission: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub relative_time: String,
    pub tags: Vec<String>,
}

/// What to do with a conflicted save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Resubmit the edited text against the latest revision
    Retry,
    /// Reopen the editor on the edited text, then resubmit
    Edit,
    /// Give up; the text stays in the recovery file
    Discard,
}

pub fn resolve_server_url(cli_server: Option<String>) -> Result<String, CliError> {
    let raw = cli_server
        .or_else(|| env::var("CIRCULEDGE_SERVER_URL").ok())
        .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());
    normalize_base_url(&raw).ok_or(CliError::InvalidServerUrl(raw))
}

pub fn connect(server: &str) -> Result<HttpClient, CliError> {
    HttpClient::new(server.to_string())
}

pub fn normalize_note_identifier(id: &str) -> Result<String, CliError> {
    let trimmed = id.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyNoteId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Resolve a full note id or a unique prefix of one
pub async fn resolve_note_id(note_query: &str, client: &HttpClient) -> Result<NoteId, CliError> {
    let note_query = normalize_note_identifier(note_query)?;
    if let Ok(note_id) = note_query.parse::<NoteId>() {
        return Ok(note_id);
    }

    let all = client.list_notes(&NoteQuery::default()).await?;
    match_note_prefix(&note_query, &all.notes)
}

pub fn match_note_prefix(prefix: &str, notes: &[NoteSummary]) -> Result<NoteId, CliError> {
    let prefix = prefix.to_ascii_lowercase();
    let matching: Vec<NoteId> = notes
        .iter()
        .map(|note| note.id)
        .filter(|id| id.to_string().starts_with(&prefix))
        .collect();

    match matching.as_slice() {
        [] => Err(CliError::NoteNotFound(prefix)),
        [only] => Ok(*only),
        _ => {
            let options = matching
                .iter()
                .take(3)
                .map(|id| short_id(*id))
                .collect::<Vec<_>>()
                .join(", ");

            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{prefix}' is ambiguous; matches: {options}"
            )))
        }
    }
}

pub fn find_channel_by_path<'a>(
    channels: &'a [Channel],
    path: &str,
) -> Result<&'a Channel, CliError> {
    let wanted = path.trim().trim_matches('/');
    channels
        .iter()
        .find(|channel| channel.has_path(wanted))
        .ok_or_else(|| CliError::ChannelNotFound(path.to_string()))
}

pub fn channel_label(channels: &[Channel], id: ChannelId) -> String {
    channels
        .iter()
        .find(|channel| channel.id == id)
        .map_or_else(|| id.to_string(), |channel| channel.path.clone())
}

pub fn short_id(id: NoteId) -> String {
    id.to_string().chars().take(13).collect()
}

pub fn format_note_lines(notes: &[NoteSummary], channels: &[Channel]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| {
            let short_id = short_id(note.id);
            let title = truncate(&note.title, 40);
            let relative_time = format_relative_time(note.updated_at, now_ms);
            let channel = channel_label(channels, note.channel);
            let tags = render_tags(&note.tags);

            if tags.is_empty() {
                format!("{short_id:<13}  {title:<40}  {relative_time:<10}  {channel}")
            } else {
                format!("{short_id:<13}  {title:<40}  {relative_time:<10}  {channel}  {tags}")
            }
        })
        .collect()
}

pub fn note_to_list_item(note: &NoteSummary, channels: &[Channel]) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();
    NoteListItem {
        id: note.id.to_string(),
        title: note.title.clone(),
        summary: note.summary.clone(),
        channel: channel_label(channels, note.channel),
        permission: note.permission.to_string(),
        created_at: note.created_at,
        updated_at: note.updated_at,
        relative_time: format_relative_time(note.updated_at, now_ms),
        tags: note.tags.clone(),
    }
}

pub fn truncate(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn render_tags(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

pub fn format_timestamp(timestamp_ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp_ms).map_or_else(
        || timestamp_ms.to_string(),
        |date_time| date_time.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Human-readable conflict report: the diff, the server text and where the
/// user's text was kept.
pub fn format_conflict_report(
    conflict: &ConflictPayload,
    server_body: Option<&str>,
    recovery_file: &Path,
) -> String {
    let mut report = format!(
        "Conflict: the note changed on the server (latest revision {}).\n\nDiff (server -> yours):\n{}\n",
        conflict.latest_revision, conflict.diff
    );
    if let Some(server_body) = server_body {
        report.push_str("\nServer version:\n");
        report.push_str(server_body);
        report.push('\n');
    }
    report.push_str(&format!(
        "\nYour version is saved in {}\n",
        recovery_file.display()
    ));
    report
}

pub fn parse_resolution(input: &str) -> Option<Resolution> {
    match input.trim().to_ascii_lowercase().as_str() {
        "r" | "retry" => Some(Resolution::Retry),
        "e" | "edit" => Some(Resolution::Edit),
        "d" | "discard" | "q" | "quit" => Some(Resolution::Discard),
        _ => None,
    }
}

/// Ask how to resolve a conflict; non-interactive sessions always discard
pub fn prompt_resolution() -> Result<Resolution, CliError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(Resolution::Discard);
    }

    loop {
        eprint!("[r]etry against latest, [e]dit again, or [d]iscard? ");
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(Resolution::Discard);
        }
        if let Some(resolution) = parse_resolution(&line) {
            return Ok(resolution);
        }
    }
}

pub fn write_recovery_file(note_id: NoteId, body: &str) -> Result<PathBuf, CliError> {
    let path = temp_file_path(&format!("circuledge-recovery-{note_id}"));
    std::fs::write(&path, body)?;
    Ok(path)
}

/// `None` for blank input; anything else is kept byte for byte
pub fn normalize_content(content: &str) -> Option<String> {
    if content.trim().is_empty() {
        None
    } else {
        Some(content.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = temp_file_path("circuledge-edit");
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn temp_file_path(stem: &str) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("{stem}-{}-{now}.md", std::process::id()))
}
