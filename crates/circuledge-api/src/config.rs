use std::collections::HashMap;
use std::env;

use circuledge_core::config::{ConflictTestConfig, StoreConfig};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: String,
    pub conflict_test_channels: bool,
    pub conflict_test_path: String,
    /// Page size for `/api/me/history` when the request names none
    pub history_page_limit: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let values: HashMap<String, String> = env::vars().collect();
        Self::from_lookup(|name| values.get(name).cloned())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = value_or_default(&lookup, "CIRCULEDGE_API_BIND_ADDR", "127.0.0.1:8080");

        let conflict_test_channels =
            parse_bool(&value_or_default(&lookup, "CIRCULEDGE_CONFLICT_TEST_CHANNELS", "false"))
                .ok_or_else(|| {
                    ConfigError::Invalid(
                        "CIRCULEDGE_CONFLICT_TEST_CHANNELS must be true or false".to_string(),
                    )
                })?;

        let conflict_test_path =
            value_or_default(&lookup, "CIRCULEDGE_CONFLICT_TEST_PATH", "test/conflict")
                .trim_matches('/')
                .to_string();
        if conflict_test_path.is_empty() {
            return Err(ConfigError::Invalid(
                "CIRCULEDGE_CONFLICT_TEST_PATH must name a channel path".to_string(),
            ));
        }

        let history_page_limit = value_or_default(&lookup, "CIRCULEDGE_HISTORY_PAGE_LIMIT", "10")
            .parse::<usize>()
            .map_err(|_| {
                ConfigError::Invalid(
                    "CIRCULEDGE_HISTORY_PAGE_LIMIT must be an integer in [1, 500]".to_string(),
                )
            })?;
        if !(1..=500).contains(&history_page_limit) {
            return Err(ConfigError::Invalid(
                "CIRCULEDGE_HISTORY_PAGE_LIMIT must be in [1, 500]".to_string(),
            ));
        }

        Ok(Self {
            bind_addr,
            conflict_test_channels,
            conflict_test_path,
            history_page_limit,
        })
    }

    /// Store settings derived from the environment
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            conflict_test: ConflictTestConfig {
                enabled: self.conflict_test_channels,
                channel_path: self.conflict_test_path.clone(),
                ..ConflictTestConfig::default()
            },
            ..StoreConfig::default()
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            conflict_test_channels: false,
            conflict_test_path: "test/conflict".to_string(),
            history_page_limit: 10,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn value_or_default(lookup: impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    optional_trimmed(lookup, name).unwrap_or_else(|| default.to_string())
}

fn optional_trimmed(lookup: impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        AppConfig::from_lookup(|key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn config_defaults_without_environment() {
        assert_eq!(config_from(&[]).unwrap(), AppConfig::default());
    }

    #[test]
    fn config_enables_conflict_test_channels() {
        let config = config_from(&[
            ("CIRCULEDGE_CONFLICT_TEST_CHANNELS", " TRUE "),
            ("CIRCULEDGE_CONFLICT_TEST_PATH", "/qa/always-conflict/"),
        ])
        .unwrap();

        let store = config.store_config();
        assert!(store.conflict_test.enabled);
        assert_eq!(store.conflict_test.channel_path, "qa/always-conflict");
        assert!(store
            .seeded_channel_paths()
            .contains(&"qa/always-conflict".to_string()));
    }

    #[test]
    fn config_rejects_bad_values() {
        let err = config_from(&[("CIRCULEDGE_CONFLICT_TEST_CHANNELS", "sometimes")]).unwrap_err();
        assert!(err.to_string().contains("CIRCULEDGE_CONFLICT_TEST_CHANNELS"));

        let err = config_from(&[("CIRCULEDGE_HISTORY_PAGE_LIMIT", "0")]).unwrap_err();
        assert!(err.to_string().contains("[1, 500]"));

        let err = config_from(&[("CIRCULEDGE_HISTORY_PAGE_LIMIT", "ten")]).unwrap_err();
        assert!(err.to_string().contains("integer"));

        let err = config_from(&[("CIRCULEDGE_CONFLICT_TEST_PATH", "///")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
