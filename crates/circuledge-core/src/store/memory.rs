//! In-memory `RevisionStore`
//!
//! One table slot per note id behind a single `RwLock`. Updates check the
//! expected revision and swap in the new snapshot while holding the write
//! guard, so concurrent compare-and-swap attempts are linearized and readers
//! only ever clone whole snapshots.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use regex::{Regex, RegexBuilder};

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use crate::models::{
    Channel, ChannelId, Note, NoteChanges, NoteId, NoteSummary, RevisionId, UserSettings,
};

use super::{AccessHistory, NoteQuery, Page, RevisionStore, SortKey, UpdateOutcome};

/// Thread-safe in-memory note table
pub struct MemoryStore {
    notes: RwLock<HashMap<NoteId, Note>>,
    channels: RwLock<Vec<Channel>>,
    settings: RwLock<UserSettings>,
    history: Mutex<AccessHistory>,
    config: StoreConfig,
}

impl MemoryStore {
    /// Create an empty store with the configured channels seeded
    pub fn new(config: StoreConfig) -> Self {
        let channels: Vec<Channel> = config
            .seeded_channel_paths()
            .iter()
            .map(Channel::new)
            .collect();
        // seeded_channel_paths always yields at least the conflict channel
        let default_channel = channels
            .iter()
            .find(|channel| channel.has_path(&config.default_channel_path))
            .or_else(|| channels.first())
            .map_or_else(ChannelId::new, |channel| channel.id);

        tracing::debug!(channels = channels.len(), "Seeded channel table");

        Self {
            notes: RwLock::new(HashMap::new()),
            channels: RwLock::new(channels),
            settings: RwLock::new(UserSettings { default_channel }),
            history: Mutex::new(AccessHistory::default()),
            config,
        }
    }

    /// Store configuration
    pub const fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Find a channel by path
    pub fn channel_by_path(&self, path: &str) -> Option<Channel> {
        read_guard(&self.channels)
            .iter()
            .find(|channel| channel.has_path(path))
            .cloned()
    }

    /// Add a channel, or return the existing one at the same path
    pub fn add_channel(&self, path: &str) -> Channel {
        let mut channels = write_guard(&self.channels);
        if let Some(existing) = channels.iter().find(|channel| channel.has_path(path)) {
            return existing.clone();
        }
        let channel = Channel::new(path);
        channels.push(channel.clone());
        channel
    }

    /// Number of notes currently held
    pub fn len(&self) -> usize {
        read_guard(&self.notes).len()
    }

    pub fn is_empty(&self) -> bool {
        read_guard(&self.notes).is_empty()
    }

    pub(super) fn settings_slot(&self) -> RwLockReadGuard<'_, UserSettings> {
        read_guard(&self.settings)
    }

    pub(super) fn settings_slot_mut(&self) -> RwLockWriteGuard<'_, UserSettings> {
        write_guard(&self.settings)
    }

    fn history_guard(&self) -> MutexGuard<'_, AccessHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn summaries_for(&self, ids: &[NoteId]) -> Vec<NoteSummary> {
        let notes = read_guard(&self.notes);
        ids.iter()
            .filter_map(|id| notes.get(id).map(Note::summary))
            .collect()
    }
}

impl RevisionStore for MemoryStore {
    fn create(&self) -> Note {
        let channel = self.settings_slot().default_channel;
        let note = Note::new(
            channel,
            self.config.default_permission,
            self.config.default_body.clone(),
        );

        write_guard(&self.notes).insert(note.id, note.clone());
        self.history_guard().promote(note.id);

        tracing::info!(note = %note.id, revision = %note.revision, "Created note");
        note
    }

    fn read(&self, id: &NoteId) -> Option<Note> {
        let note = self.peek(id)?;
        self.history_guard().promote(note.id);
        Some(note)
    }

    fn peek(&self, id: &NoteId) -> Option<Note> {
        read_guard(&self.notes).get(id).cloned()
    }

    fn update(&self, id: &NoteId, expected: RevisionId, changes: NoteChanges) -> UpdateOutcome {
        let mut notes = write_guard(&self.notes);
        let Some(slot) = notes.get_mut(id) else {
            return UpdateOutcome::NotFound;
        };

        if slot.revision != expected {
            tracing::debug!(
                note = %id,
                expected = %expected,
                current = %slot.revision,
                "Rejected update against stale revision"
            );
            return UpdateOutcome::Conflict(slot.clone());
        }

        *slot = slot.revised(changes);
        tracing::info!(note = %id, revision = %slot.revision, "Updated note");
        UpdateOutcome::Updated(slot.clone())
    }

    fn delete(&self, id: &NoteId) -> bool {
        let removed = write_guard(&self.notes).remove(id).is_some();
        if removed {
            self.history_guard().forget(id);
            tracing::info!(note = %id, "Deleted note");
        }
        removed
    }

    fn list(&self, query: &NoteQuery) -> Result<Page<NoteSummary>> {
        let tags = query
            .tag
            .iter()
            .map(|pattern| compile_pattern(Some(pattern.as_str()), "tag"))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();
        let title = compile_pattern(query.title.as_deref(), "title")?;
        let body = compile_pattern(query.body.as_deref(), "body")?;

        let mut matches: Vec<NoteSummary> = read_guard(&self.notes)
            .values()
            .filter(|note| query.channel.map_or(true, |channel| note.channel == channel))
            .filter(|note| body.as_ref().map_or(true, |re| re.is_match(&note.body)))
            .map(Note::summary)
            .filter(|summary| title.as_ref().map_or(true, |re| re.is_match(&summary.title)))
            .filter(|summary| {
                tags.is_empty()
                    || tags
                        .iter()
                        .any(|re| summary.tags.iter().any(|t| re.is_match(t)))
            })
            .collect();

        sort_summaries(&mut matches, query.sort);

        let total = matches.len();
        let items = paginate(matches, query.offset, query.limit);
        Ok(Page { total, items })
    }

    fn history(&self, limit: usize, offset: usize) -> Page<NoteSummary> {
        let ids = self.history_guard().ids();
        let summaries = self.summaries_for(&ids);
        let total = summaries.len();
        Page {
            total,
            items: paginate(summaries, offset, Some(limit)),
        }
    }

    fn channel(&self, id: &ChannelId) -> Option<Channel> {
        read_guard(&self.channels)
            .iter()
            .find(|channel| channel.id == *id)
            .cloned()
    }

    fn channels(&self) -> Vec<Channel> {
        read_guard(&self.channels).clone()
    }
}

fn read_guard<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_guard<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn compile_pattern(pattern: Option<&str>, field: &str) -> Result<Option<Regex>> {
    let Some(pattern) = pattern.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map(Some)
        .map_err(|error| Error::Malformed(format!("invalid {field} pattern: {error}")))
}

fn sort_summaries(summaries: &mut [NoteSummary], sort: SortKey) {
    match sort {
        SortKey::DateAsc => summaries.sort_by_key(|s| (s.updated_at, s.id)),
        SortKey::DateDesc => summaries.sort_by_key(|s| Reverse((s.updated_at, s.id))),
        SortKey::TitleAsc => summaries.sort_by_cached_key(|s| (s.title.to_lowercase(), s.id)),
        SortKey::TitleDesc => {
            summaries.sort_by_cached_key(|s| Reverse((s.title.to_lowercase(), s.id)));
        }
    }
}

fn paginate<T>(items: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
    let iter = items.into_iter().skip(offset);
    match limit {
        Some(limit) => iter.take(limit).collect(),
        None => iter.collect(),
    }
}
