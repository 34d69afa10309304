//! Recently viewed notes

use std::collections::VecDeque;

use crate::models::NoteId;

/// Oldest entries beyond this many are forgotten
const HISTORY_CAPACITY: usize = 1_000;

/// Most-recently-viewed log, deduplicated by id, most recent first
#[derive(Debug, Default, Clone)]
pub struct AccessHistory {
    entries: VecDeque<NoteId>,
}

impl AccessHistory {
    /// Move `id` to the front, dropping any older entry for it
    pub fn promote(&mut self, id: NoteId) {
        self.entries.retain(|entry| *entry != id);
        self.entries.push_front(id);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn forget(&mut self, id: &NoteId) {
        self.entries.retain(|entry| entry != id);
    }

    /// Snapshot of the ids, most recent first
    #[must_use]
    pub fn ids(&self) -> Vec<NoteId> {
        self.entries.iter().copied().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn promote_deduplicates_to_front() {
        let (x, y) = (NoteId::new(), NoteId::new());
        let mut history = AccessHistory::default();
        history.promote(x);
        history.promote(y);
        history.promote(x);
        assert_eq!(history.ids(), vec![x, y]);
    }

    #[test]
    fn forget_removes_entry() {
        let (x, y) = (NoteId::new(), NoteId::new());
        let mut history = AccessHistory::default();
        history.promote(x);
        history.promote(y);
        history.forget(&x);
        assert_eq!(history.ids(), vec![y]);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn capacity_is_bounded() {
        let mut history = AccessHistory::default();
        for _ in 0..(HISTORY_CAPACITY + 5) {
            history.promote(NoteId::new());
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
    }
}
