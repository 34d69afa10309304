//! Store configuration.
//!
//! Defaults for newly created notes, the seeded channel set, and the opt-in
//! always-conflict test channel.

use serde::{Deserialize, Serialize};

use crate::models::Permission;
use crate::util::normalize_text_option;

/// Channel path new notes land in unless the user settings say otherwise
pub const DEFAULT_CHANNEL_PATH: &str = "general";
/// Channel path that always conflicts when the test mode is enabled
pub const CONFLICT_TEST_CHANNEL_PATH: &str = "test/conflict";
const DEFAULT_NOTE_BODY: &str = "# New note\n\nStart writing here...";
const CONFLICT_TEST_MARKER: &str =
    "\n\n## Added on the server by another user\n\nThis content appeared through a concurrent edit.";

/// Configuration for the in-memory revision store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Path of the channel used as the initial default
    pub default_channel_path: String,
    /// Permission assigned to created notes
    pub default_permission: Permission,
    /// Body assigned to created notes
    pub default_body: String,
    /// Additional channel paths seeded at startup
    pub extra_channel_paths: Vec<String>,
    /// Always-conflict fixture
    pub conflict_test: ConflictTestConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_channel_path: DEFAULT_CHANNEL_PATH.to_string(),
            default_permission: Permission::Private,
            default_body: DEFAULT_NOTE_BODY.to_string(),
            extra_channel_paths: Vec::new(),
            conflict_test: ConflictTestConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Every channel path to seed, default first, deduplicated.
    ///
    /// The conflict test channel is always present so fixtures can address it
    /// even while the mode is disabled.
    pub fn seeded_channel_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        let candidates = std::iter::once(self.default_channel_path.clone())
            .chain(self.extra_channel_paths.iter().cloned())
            .chain(std::iter::once(self.conflict_test.channel_path.clone()));
        for candidate in candidates {
            let Some(path) = normalize_text_option(Some(candidate))
                .map(|path| path.trim_matches('/').to_string())
            else {
                continue;
            };
            if !path.is_empty() && !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }
}

/// Opt-in fixture that forces every update in one channel to conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConflictTestConfig {
    pub enabled: bool,
    pub channel_path: String,
    /// Text appended to the stored body before comparison
    pub marker: String,
}

impl Default for ConflictTestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            channel_path: CONFLICT_TEST_CHANNEL_PATH.to_string(),
            marker: CONFLICT_TEST_MARKER.to_string(),
        }
    }
}

impl ConflictTestConfig {
    /// Enabled fixture on the default test channel
    #[must_use]
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }
}
