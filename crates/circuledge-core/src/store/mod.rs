//! Revision store for Circuledge

mod history;
mod memory;
mod repository;
mod settings_repository;

pub use history::AccessHistory;
pub use memory::MemoryStore;
pub use repository::{NoteQuery, Page, RevisionStore, SortKey, UpdateOutcome};
pub use settings_repository::SettingsRepository;
