use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;

use crate::{KeyValueStore, LocalError, StorageKey};

/// One JSON file per key under a data directory.
///
/// Writes go to `<key>.json.tmp` first and are renamed into place, so a crash
/// mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LocalError::Io`] if the directory cannot be created.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, LocalError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| LocalError::io(&dir, e))?;
        tracing::debug!(dir = %dir.display(), "local store opened");
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, key: StorageKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: StorageKey) -> Result<Option<Value>, LocalError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(LocalError::io(path, e)),
        };
        let value = serde_json::from_slice(&bytes).map_err(|source| LocalError::Corrupt {
            key: key.as_str(),
            source,
        })?;
        Ok(Some(value))
    }

    async fn set(&self, key: StorageKey, value: &Value) -> Result<(), LocalError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(value)?;
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| LocalError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| LocalError::io(&path, e))?;
        tracing::trace!(key = %key, "local value written");
        Ok(())
    }

    async fn delete(&self, key: StorageKey) -> Result<(), LocalError> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(LocalError::io(path, e)),
        }
    }
}
