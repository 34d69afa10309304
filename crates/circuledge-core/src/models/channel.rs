//! Channel model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A unique identifier for a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(Uuid);

impl ChannelId {
    /// Create a new unique channel ID
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

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ChannelId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A container notes belong to, addressed by a slash-separated path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Unique identifier
    pub id: ChannelId,
    /// Path such as `project/circuledge` (no leading or trailing slash)
    pub path: String,
}

impl Channel {
    /// Create a new channel, normalizing surrounding slashes off the path
    #[must_use]
    pub fn new(path: impl AsRef<str>) -> Self {
        Self {
            id: ChannelId::new(),
            path: normalize_path(path.as_ref()),
        }
    }

    /// Whether this channel sits at `path`, ignoring surrounding slashes
    #[must_use]
    pub fn has_path(&self, path: &str) -> bool {
        self.path == normalize_path(path)
    }
}

fn normalize_path(path: &str) -> String {
    path.trim().trim_matches('/').to_string()
}
