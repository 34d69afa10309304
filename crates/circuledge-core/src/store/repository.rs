//! Note repository contract

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{Channel, ChannelId, Note, NoteChanges, NoteId, NoteSummary, RevisionId};

/// Result of a compare-and-swap update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The expected revision matched; carries the new snapshot
    Updated(Note),
    /// The expected revision was stale; carries the untouched current snapshot
    Conflict(Note),
    /// No note with that id
    NotFound,
}

/// One page of a listing, with the match count before pagination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: usize,
    pub items: Vec<T>,
}

/// Ordering for note listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    DateAsc,
    #[default]
    DateDesc,
    TitleAsc,
    TitleDesc,
}

impl SortKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DateAsc => "dateAsc",
            Self::DateDesc => "dateDesc",
            Self::TitleAsc => "titleAsc",
            Self::TitleDesc => "titleDesc",
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [Self::DateAsc, Self::DateDesc, Self::TitleAsc, Self::TitleDesc]
            .into_iter()
            .find(|key| key.as_str() == s.trim())
            .ok_or_else(|| Error::Malformed(format!("unknown sort key: {s}")))
    }
}

/// Filters for note listings.
///
/// Patterns are case-insensitive regular expressions. A note passes the tag
/// filter when any of its tags matches any of the `tag` patterns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteQuery {
    pub channel: Option<ChannelId>,
    pub tag: Vec<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub sort: SortKey,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl NoteQuery {
    /// Build a query from URL query pairs; `tag` may repeat and unknown keys
    /// are ignored
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "channel" => {
                    let channel = value
                        .parse()
                        .map_err(|_| Error::Malformed(format!("invalid channel id: {value}")))?;
                    query.channel = Some(channel);
                }
                "tag" => query.tag.push(value),
                "title" => query.title = Some(value),
                "body" => query.body = Some(value),
                "sortkey" => query.sort = value.parse()?,
                "limit" => query.limit = Some(parse_count("limit", &value)?),
                "offset" => query.offset = parse_count("offset", &value)?,
                _ => {}
            }
        }
        Ok(query)
    }

    /// The inverse of [`NoteQuery::from_pairs`]
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(channel) = self.channel {
            pairs.push(("channel", channel.to_string()));
        }
        pairs.extend(self.tag.iter().map(|tag| ("tag", tag.clone())));
        if let Some(title) = &self.title {
            pairs.push(("title", title.clone()));
        }
        if let Some(body) = &self.body {
            pairs.push(("body", body.clone()));
        }
        pairs.push(("sortkey", self.sort.as_str().to_string()));
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs.push(("offset", self.offset.to_string()));
        pairs
    }
}

fn parse_count(field: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Malformed(format!("invalid {field}: {value}")))
}

/// Trait for note storage operations.
///
/// Every mutation of an existing note goes through [`RevisionStore::update`],
/// which must be atomic per note id.
pub trait RevisionStore: Send + Sync {
    /// Create a note in the default channel with a fresh id and revision
    fn create(&self) -> Note;

    /// Get a note by ID, promoting it in the access history
    fn read(&self, id: &NoteId) -> Option<Note>;

    /// Get a note by ID without touching the access history
    fn peek(&self, id: &NoteId) -> Option<Note>;

    /// Replace the note's fields if its current revision equals `expected`
    fn update(&self, id: &NoteId, expected: RevisionId, changes: NoteChanges) -> UpdateOutcome;

    /// Remove a note, returning whether it existed
    fn delete(&self, id: &NoteId) -> bool;

    /// Filtered, sorted, paginated summaries
    fn list(&self, query: &NoteQuery) -> Result<Page<NoteSummary>>;

    /// Most recently read notes first
    fn history(&self, limit: usize, offset: usize) -> Page<NoteSummary>;

    /// Look up a channel
    fn channel(&self, id: &ChannelId) -> Option<Channel>;

    /// All channels in seeding order
    fn channels(&self) -> Vec<Channel>;
}
