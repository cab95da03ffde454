//! Local storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the task, trash, and session files. Empty means the
    /// platform data directory (`~/.local/share/tally` on Linux).
    #[serde(default)]
    pub data_dir: String,
}

impl StorageConfig {
    /// Resolve the data directory, falling back to `./.tally/data` when the
    /// platform has no data directory.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        if !self.data_dir.trim().is_empty() {
            return PathBuf::from(self.data_dir.trim());
        }
        dirs::data_dir().map_or_else(
            || PathBuf::from(".tally").join("data"),
            |dir| dir.join("tally"),
        )
    }
}
