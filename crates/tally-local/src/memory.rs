use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;

use crate::{KeyValueStore, LocalError, StorageKey};

/// Process-local store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<StorageKey, Value>>,
    writes: Mutex<usize>,
    /// Number of upcoming `set` calls that fail.
    failing_writes: Mutex<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without counting it as a write.
    #[must_use]
    pub fn with_value(self, key: StorageKey, value: Value) -> Self {
        self.values.lock().insert(key, value);
        self
    }

    /// Current value under `key`, synchronously.
    #[must_use]
    pub fn peek(&self, key: StorageKey) -> Option<Value> {
        self.values.lock().get(&key).cloned()
    }

    /// Make the next `set` fail with an I/O error, leaving the stored value
    /// untouched. Repeated calls queue further failures.
    pub fn fail_next_write(&self) {
        *self.failing_writes.lock() += 1;
    }

    /// Number of successful `set` and `delete` calls so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        *self.writes.lock()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: StorageKey) -> Result<Option<Value>, LocalError> {
        Ok(self.peek(key))
    }

    async fn set(&self, key: StorageKey, value: &Value) -> Result<(), LocalError> {
        {
            let mut failing = self.failing_writes.lock();
            if *failing > 0 {
                *failing -= 1;
                return Err(LocalError::io(
                    format!("memory:{key}"),
                    std::io::Error::other("injected write failure"),
                ));
            }
        }
        self.values.lock().insert(key, value.clone());
        *self.writes.lock() += 1;
        Ok(())
    }

    async fn delete(&self, key: StorageKey) -> Result<(), LocalError> {
        self.values.lock().remove(&key);
        *self.writes.lock() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let store = MemoryStore::new();
        assert!(store.get(StorageKey::Tasks).await.unwrap().is_none());

        store.set(StorageKey::Tasks, &json!([1, 2])).await.unwrap();
        assert_eq!(store.get(StorageKey::Tasks).await.unwrap(), Some(json!([1, 2])));

        store.delete(StorageKey::Tasks).await.unwrap();
        store.delete(StorageKey::Tasks).await.unwrap();
        assert!(store.get(StorageKey::Tasks).await.unwrap().is_none());
        assert_eq!(store.write_count(), 3);
    }

    #[tokio::test]
    async fn injected_failure_hits_one_write() {
        let store = MemoryStore::new().with_value(StorageKey::Tasks, json!([1]));
        store.fail_next_write();

        let err = store.set(StorageKey::Tasks, &json!([2])).await.unwrap_err();
        assert!(matches!(err, LocalError::Io { .. }));
        assert_eq!(store.peek(StorageKey::Tasks), Some(json!([1])));
        assert_eq!(store.write_count(), 0);

        store.set(StorageKey::Tasks, &json!([3])).await.unwrap();
        assert_eq!(store.peek(StorageKey::Tasks), Some(json!([3])));
    }

    #[test]
    fn seeded_values_are_not_writes() {
        let store = MemoryStore::new().with_value(StorageKey::Session, json!({"accessToken": "t"}));
        assert_eq!(store.write_count(), 0);
        assert!(store.peek(StorageKey::Session).is_some());
    }
}
