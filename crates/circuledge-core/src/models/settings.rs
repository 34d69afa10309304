//! User settings model

use serde::{Deserialize, Serialize};

use super::ChannelId;

/// Per-user settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    /// Channel newly created notes are placed in
    pub default_channel: ChannelId,
}
