//! State shared between the store and its sync engine.

use std::sync::Arc;

use parking_lot::Mutex;
use tally_core::entities::{Task, TaskSet};
use tally_local::{KeyValueStore, StorageKey};

pub(crate) struct Shared {
    tasks: Mutex<TaskSet>,
    persistence: Arc<dyn KeyValueStore>,
    /// Serializes local writes.
    write_lane: tokio::sync::Mutex<()>,
}

impl Shared {
    pub(crate) async fn load(persistence: Arc<dyn KeyValueStore>) -> Self {
        let active = read_tasks(persistence.as_ref(), StorageKey::Tasks).await;
        let trashed = read_tasks(persistence.as_ref(), StorageKey::TrashedTasks).await;
        let tasks = TaskSet::from_parts(active, trashed);
        tracing::debug!(
            active = tasks.active.len(),
            trashed = tasks.trashed.len(),
            "task set loaded"
        );
        Self {
            tasks: Mutex::new(tasks),
            persistence,
            write_lane: tokio::sync::Mutex::new(()),
        }
    }

    /// Run `f` against the task set under the lock. Never hold across `.await`.
    pub(crate) fn with<R>(&self, f: impl FnOnce(&mut TaskSet) -> R) -> R {
        f(&mut *self.tasks.lock())
    }

    pub(crate) fn snapshot(&self) -> TaskSet {
        self.tasks.lock().clone()
    }

    pub(crate) fn replace(&self, set: TaskSet) {
        *self.tasks.lock() = set;
    }

    /// Write the current task set to local persistence.
    ///
    /// The snapshot is taken after entering the write lane, so whichever
    /// write finishes last carries the newest state. Failures are logged;
    /// memory stays authoritative and the next mutation rewrites everything.
    pub(crate) async fn persist(&self) {
        let _lane = self.write_lane.lock().await;
        let snapshot = self.snapshot();
        write_tasks(self.persistence.as_ref(), StorageKey::Tasks, &snapshot.active).await;
        write_tasks(self.persistence.as_ref(), StorageKey::TrashedTasks, &snapshot.trashed).await;
    }
}

async fn read_tasks(persistence: &dyn KeyValueStore, key: StorageKey) -> Vec<Task> {
    let value = match persistence.get(key).await {
        Ok(Some(value)) => value,
        Ok(None) => return Vec::new(),
        Err(error) => {
            tracing::warn!(%key, %error, "failed to read local tasks; starting empty");
            return Vec::new();
        }
    };
    let serde_json::Value::Array(items) = value else {
        tracing::warn!(%key, "local tasks are not a list; starting empty");
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Task>(item) {
            Ok(task) => Some(task),
            Err(error) => {
                tracing::warn!(%key, %error, "skipping unreadable local task");
                None
            }
        })
        .collect()
}

async fn write_tasks(persistence: &dyn KeyValueStore, key: StorageKey, tasks: &[Task]) {
    let value = match serde_json::to_value(tasks) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%key, %error, "failed to encode tasks");
            return;
        }
    };
    if let Err(error) = persistence.set(key, &value).await {
        tracing::warn!(%key, %error, "local write failed");
    }
}
