//! Settings repository implementation

use crate::error::{Error, Result};
use crate::models::UserSettings;

use super::{MemoryStore, RevisionStore};

/// Trait for user settings storage operations
pub trait SettingsRepository {
    /// Load the current settings
    fn settings(&self) -> UserSettings;

    /// Replace the settings, returning the stored value
    fn update_settings(&self, settings: UserSettings) -> Result<UserSettings>;
}

impl SettingsRepository for MemoryStore {
    fn settings(&self) -> UserSettings {
        self.settings_slot().clone()
    }

    fn update_settings(&self, settings: UserSettings) -> Result<UserSettings> {
        if self.channel(&settings.default_channel).is_none() {
            return Err(Error::Malformed(format!(
                "unknown default channel: {}",
                settings.default_channel
            )));
        }

        *self.settings_slot_mut() = settings.clone();
        tracing::info!(default_channel = %settings.default_channel, "Updated user settings");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::models::ChannelId;

    #[test]
    fn test_update_settings_changes_create_channel() {
        let store = MemoryStore::new(StoreConfig::default());
        let conflict_channel = store
            .channels()
            .into_iter()
            .find(|channel| channel.has_path("test/conflict"))
            .unwrap();

        store
            .update_settings(UserSettings {
                default_channel: conflict_channel.id,
            })
            .unwrap();

        assert_eq!(store.settings().default_channel, conflict_channel.id);
        assert_eq!(store.create().channel, conflict_channel.id);
    }

    #[test]
    fn test_update_settings_rejects_unknown_channel() {
        let store = MemoryStore::new(StoreConfig::default());
        let before = store.settings();

        let err = store
            .update_settings(UserSettings {
                default_channel: ChannelId::new(),
            })
            .unwrap_err();

        assert!(matches!(err, Error::Malformed(_)));
        assert_eq!(store.settings(), before);
    }
}
