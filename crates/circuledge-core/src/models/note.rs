//! Note model

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use uuid::Uuid;

use super::ChannelId;
use crate::util::unix_millis_now;

/// Maximum number of characters kept when deriving a title from a body
const TITLE_MAX_CHARS: usize = 80;

/// Maximum number of characters kept in a derived summary
const SUMMARY_MAX_CHARS: usize = 100;

/// Title shown for notes without any text
pub const UNTITLED: &str = "Untitled";

/// Summary shown for notes without any prose
pub const NO_SUMMARY: &str = "No summary";

/// A unique identifier for a note, using UUID v7 (time-sortable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> String {
        self.0.to_string()
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Opaque revision token stamped on every successful mutation.
///
/// Tokens are never reused; equality is the only operation that carries
/// meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RevisionId(Uuid);

impl RevisionId {
    /// Issue a fresh revision token
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for RevisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RevisionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Visibility of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Anyone can read
    Public,
    /// Members of the owning channel can read
    Limited,
    /// Only the owner can read
    #[default]
    Private,
}

impl Permission {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Limited => "limited",
            Self::Private => "private",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "limited" => Ok(Self::Limited),
            "private" => Ok(Self::Private),
            other => Err(format!(
                "unknown permission '{other}' (expected public, limited or private)"
            )),
        }
    }
}

/// A note as held in the store: exactly one current snapshot per id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Current revision token
    pub revision: RevisionId,
    /// Owning channel
    pub channel: ChannelId,
    /// Visibility
    pub permission: Permission,
    /// Markdown body
    pub body: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

impl Note {
    /// Create a new note with a fresh id and revision
    #[must_use]
    pub fn new(channel: ChannelId, permission: Permission, body: impl Into<String>) -> Self {
        let now = unix_millis_now();
        Self {
            id: NoteId::new(),
            revision: RevisionId::new(),
            channel,
            permission,
            body: body.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the mutable fields, issuing a fresh revision and timestamp.
    ///
    /// The result is a new snapshot; `self` is left untouched so the caller
    /// can swap it into the slot in one step.
    #[must_use]
    pub fn revised(&self, changes: NoteChanges) -> Self {
        let now = unix_millis_now();
        Self {
            id: self.id,
            revision: RevisionId::new(),
            channel: changes.channel,
            permission: changes.permission,
            body: changes.body,
            created_at: self.created_at,
            updated_at: now.max(self.updated_at),
        }
    }

    /// The read-response shape of this note
    #[must_use]
    pub fn snapshot(&self) -> RevisionedSnapshot {
        RevisionedSnapshot {
            revision: self.revision,
            channel: self.channel,
            permission: self.permission,
            body: self.body.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Listing view of this note
    #[must_use]
    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id,
            channel: self.channel,
            permission: self.permission,
            title: self.title(),
            summary: extract_summary(&self.body),
            tags: self.tags(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Title derived from the first non-blank body line
    #[must_use]
    pub fn title(&self) -> String {
        extract_title(&self.body)
    }

    /// Extract #tags from the body
    #[must_use]
    pub fn tags(&self) -> Vec<String> {
        extract_tags(&self.body)
    }
}

/// Full replacement values for the mutable fields of a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteChanges {
    pub channel: ChannelId,
    pub permission: Permission,
    pub body: String,
}

/// A note's content at a point in time, as returned to readers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevisionedSnapshot {
    pub revision: RevisionId,
    pub channel: ChannelId,
    pub permission: Permission,
    pub body: String,
    /// Creation timestamp (Unix ms)
    pub created_at: i64,
    /// Last update timestamp (Unix ms)
    pub updated_at: i64,
}

/// Listing view of a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: NoteId,
    pub channel: ChannelId,
    pub permission: Permission,
    pub title: String,
    pub summary: String,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Derive a title from the first non-blank line of `body`.
///
/// Leading Markdown heading markers are stripped and the result is truncated
/// to 80 characters. A body without text is [`UNTITLED`].
#[must_use]
pub fn extract_title(body: &str) -> String {
    body.lines()
        .map(|line| line.trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .unwrap_or(UNTITLED)
        .chars()
        .take(TITLE_MAX_CHARS)
        .collect()
}

/// Plain-text preview of `body`: Markdown syntax removed, whitespace
/// collapsed, cut at the first sentence and capped at 100 characters.
#[must_use]
pub fn extract_summary(body: &str) -> String {
    let mut text = body.trim().to_string();
    for (pattern, replacement) in summary_rules() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    let text = text.trim();

    let first = text
        .split(['.', '。', '!', '！', '?', '？'])
        .next()
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .unwrap_or(text);

    if first.is_empty() {
        return NO_SUMMARY.to_string();
    }
    if first.chars().count() > SUMMARY_MAX_CHARS {
        let cut: String = first.chars().take(SUMMARY_MAX_CHARS).collect();
        return format!("{cut}...");
    }
    first.to_string()
}

fn summary_rules() -> &'static [(Regex, &'static str)] {
    static RULES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        [
            (r"(?s)```.*?```", ""),
            (r"(?s)~~~.*?~~~", ""),
            (r"(?s)\$\$.*?\$\$", ""),
            (r"\$[^$\n]+\$", ""),
            (r"(?m)^#{1,6}\s+", ""),
            (r"!\[[^\]]*\]\([^)]+\)", ""),
            (r"\[([^\]]+)\]\([^)]+\)", "$1"),
            (r"\*\*(.*?)\*\*", "$1"),
            (r"__(.*?)__", "$1"),
            (r"\*([^*]+)\*", "$1"),
            (r"_([^_]+)_", "$1"),
            (r"`([^`]+)`", "$1"),
            (r"(?m)^[ \t]*[-=]{3,}[ \t]*$", ""),
            (r"(?m)^[ \t]*[-*+][ \t]+", ""),
            (r"(?m)^[ \t]*\d+\.[ \t]+", ""),
            (r"(?m)^[ \t]*>[ \t]*", ""),
            (r"\s+", " "),
        ]
        .into_iter()
        .map(|(pattern, replacement)| {
            (Regex::new(pattern).expect("Invalid regex"), replacement)
        })
        .collect()
    })
}

/// Extract #tags from text
///
/// Valid tags match the pattern: `#[a-zA-Z][a-zA-Z0-9_-]*`
/// Tags are returned in lowercase, deduplicated and sorted.
///
/// # Examples
///
/// ```
/// use circuledge_core::models::extract_tags;
///
/// let tags = extract_tags("Hello #world this is #Rust-lang");
/// assert_eq!(tags, vec!["rust-lang".to_string(), "world".to_string()]);
/// ```
#[must_use]
pub fn extract_tags(text: &str) -> Vec<String> {
    let re = Regex::new(r"#([a-zA-Z][a-zA-Z0-9_-]*)").expect("Invalid regex");
    re.captures_iter(text)
        .map(|cap| cap[1].to_lowercase())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
