//! Conflict payload model

use serde::{Deserialize, Serialize};

use super::{ChannelId, Note, Permission, RevisionId};

/// Response value for an update whose base revision is stale.
///
/// Carries the authoritative current values and a rendered diff of the
/// server body against the submitted body. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictPayload {
    /// The store's current revision, unequal to the caller's base
    #[serde(rename = "latest-revision")]
    pub latest_revision: RevisionId,
    pub channel: ChannelId,
    pub permission: Permission,
    /// `+ `/`- ` prefixed lines; never empty when the bodies differ
    pub diff: String,
}

impl ConflictPayload {
    /// Build a payload from the winning note and a rendered diff
    #[must_use]
    pub fn from_current(current: &Note, diff: String) -> Self {
        Self {
            latest_revision: current.revision,
            channel: current.channel,
            permission: current.permission,
            diff,
        }
    }
}
