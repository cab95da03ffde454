//! Remote sync configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_enabled() -> bool {
    true
}

/// Quiet period after the last mutation before a sync runs.
const fn default_debounce_ms() -> u64 {
    2_000
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_file_name() -> String {
    "tally-tasks.json".to_string()
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Whether mutations replicate to the remote backend at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Name of the single remote document.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Base URL of the Drive-compatible API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            debounce_ms: default_debounce_ms(),
            file_name: default_file_name(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Reject values the sync engine cannot work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty file name, an
    /// empty API URL, or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sync.file_name".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "sync.api_base_url".into(),
                reason: "must not be empty".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "sync.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = SyncConfig::default();
        assert!(config.enabled);
        assert_eq!(config.debounce(), Duration::from_secs(2));
        assert_eq!(config.file_name, "tally-tasks.json");
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_file_name_is_invalid() {
        let config = SyncConfig {
            file_name: " ".into(),
            ..SyncConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sync.file_name"));
    }
}
