//! Revision-checked updates and conflict reporting.

mod detector;

pub use detector::{ConflictDetector, SubmitOutcome};
