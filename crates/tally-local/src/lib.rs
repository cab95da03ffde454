//! # tally-local
//!
//! Local persistence for Tally. State is kept as whole JSON values under a
//! handful of fixed keys, so a write always replaces the previous value for
//! its key.
//!
//! - [`FileStore`] keeps one `<key>.json` file per key in a data directory.
//! - [`MemoryStore`] keeps values in process memory.

mod error;
mod file;
mod key;
mod memory;

pub use error::LocalError;
pub use file::FileStore;
pub use key::StorageKey;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;

/// A string-keyed store of JSON values.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if nothing was ever written.
    async fn get(&self, key: StorageKey) -> Result<Option<Value>, LocalError>;

    /// Replace the value under `key`.
    async fn set(&self, key: StorageKey, value: &Value) -> Result<(), LocalError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: StorageKey) -> Result<(), LocalError>;
}
