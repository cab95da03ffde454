//! The task store.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tally_auth::CredentialProvider;
use tally_core::entities::{Task, TaskDraft, TaskSet};
use tally_core::query::{DateRange, TaskFilter, TaskSummary};
use tally_core::updates::TaskPatch;
use tally_local::KeyValueStore;
use tally_remote::RemoteStore;

use crate::error::{StoreError, SyncError};
use crate::shared::Shared;
use crate::sync::{SyncEngine, SyncOutcome, SyncSettings};

/// Owns the task set. Construct once and share by reference or `Arc`.
pub struct TaskStore {
    shared: Arc<Shared>,
    sync: Option<SyncEngine>,
}

impl TaskStore {
    /// Open a local-only store.
    pub async fn open(persistence: Arc<dyn KeyValueStore>) -> Self {
        Self {
            shared: Arc::new(Shared::load(persistence).await),
            sync: None,
        }
    }

    /// Open a store that replicates to `remote`.
    pub async fn open_synced(
        persistence: Arc<dyn KeyValueStore>,
        remote: Arc<dyn RemoteStore>,
        credentials: Arc<dyn CredentialProvider>,
        settings: SyncSettings,
    ) -> Self {
        let shared = Arc::new(Shared::load(persistence).await);
        let sync = SyncEngine::new(Arc::clone(&shared), remote, credentials, settings);
        Self {
            shared,
            sync: Some(sync),
        }
    }

    #[must_use]
    pub const fn sync_engine(&self) -> Option<&SyncEngine> {
        self.sync.as_ref()
    }

    /// Create a task from `draft`, giving it the next free id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] if the draft fails validation; nothing is
    /// stored in that case.
    pub async fn add_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        let today = today();
        let task = self.shared.with(|set| {
            let task = draft.into_task(set.next_id(), today)?;
            set.insert_new(task.clone());
            Ok::<_, StoreError>(task)
        })?;
        tracing::debug!(id = %task.id, "task added");
        self.committed().await;
        Ok(task)
    }

    /// Replace the active task that has `task.id`.
    ///
    /// Returns `Ok(None)` when no active task has that id; a trashed task is
    /// never brought back this way.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] if `task` fails validation.
    pub async fn update_task(&self, mut task: Task) -> Result<Option<Task>, StoreError> {
        task.title = task.title.trim().to_string();
        task.validate()?;
        let updated = self.shared.with(|set| set.replace_active(task).cloned());
        if updated.is_some() {
            self.committed().await;
        }
        Ok(updated)
    }

    /// Apply `patch` to the active task `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Core`] if the patched task fails validation.
    pub async fn patch_task(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>, StoreError> {
        let updated = self.shared.with(|set| {
            let Some(current) = set.find_active(id).cloned() else {
                return Ok(None);
            };
            let next = patch.apply(current)?;
            Ok::<_, StoreError>(set.replace_active(next).cloned())
        })?;
        if updated.is_some() {
            self.committed().await;
        }
        Ok(updated)
    }

    /// Move an active task to the trash.
    pub async fn delete_task(&self, id: &str) -> Option<Task> {
        let trashed = self.shared.with(|set| set.trash(id).cloned());
        if trashed.is_some() {
            tracing::debug!(id, "task trashed");
            self.committed().await;
        }
        trashed
    }

    /// Move a trashed task back to the active list, unchanged.
    pub async fn restore_task(&self, id: &str) -> Option<Task> {
        let restored = self.shared.with(|set| set.restore(id).cloned());
        if restored.is_some() {
            tracing::debug!(id, "task restored");
            self.committed().await;
        }
        restored
    }

    /// Remove a task from the trash for good. Active tasks are untouched.
    pub async fn permanently_delete_task(&self, id: &str) -> Option<Task> {
        let purged = self.shared.with(|set| set.purge(id));
        if purged.is_some() {
            tracing::debug!(id, "task purged");
            self.committed().await;
        }
        purged
    }

    /// Empty the trash, returning how many tasks were removed.
    pub async fn clear_trash(&self) -> usize {
        let removed = self.shared.with(TaskSet::clear_trash);
        if removed > 0 {
            tracing::debug!(removed, "trash cleared");
            self.committed().await;
        }
        removed
    }

    #[must_use]
    pub fn get_task(&self, id: &str) -> Option<Task> {
        self.shared.with(|set| set.find_active(id).cloned())
    }

    #[must_use]
    pub fn get_trashed(&self, id: &str) -> Option<Task> {
        self.shared.with(|set| set.find_trashed(id).cloned())
    }

    #[must_use]
    pub fn active_tasks(&self) -> Vec<Task> {
        self.shared.with(|set| set.active.clone())
    }

    #[must_use]
    pub fn trashed_tasks(&self) -> Vec<Task> {
        self.shared.with(|set| set.trashed.clone())
    }

    #[must_use]
    pub fn snapshot(&self) -> TaskSet {
        self.shared.snapshot()
    }

    /// Active tasks matching `filter`, newest first.
    #[must_use]
    pub fn query(&self, filter: &TaskFilter) -> Vec<Task> {
        self.shared.with(|set| filter.apply(&set.active))
    }

    /// Dashboard figures over active tasks created within `range`.
    #[must_use]
    pub fn summary(&self, range: Option<DateRange>) -> TaskSummary {
        let today = today();
        self.shared
            .with(|set| TaskSummary::compute(&set.active, range.unwrap_or_default(), today))
    }

    /// Run a sync cycle now. `Ok(None)` for a local-only store.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if the cycle cannot run or fails.
    pub async fn flush(&self) -> Result<Option<SyncOutcome>, SyncError> {
        match &self.sync {
            Some(sync) => sync.flush().await.map(Some),
            None => Ok(None),
        }
    }

    /// Resolve the remote document before the session's first mutation.
    /// `Ok(None)` for a local-only store, otherwise whether remote tasks
    /// replaced local ones.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] if there is no credential or the remote fails.
    pub async fn pull(&self) -> Result<Option<bool>, SyncError> {
        match &self.sync {
            Some(sync) => sync.pull().await.map(Some),
            None => Ok(None),
        }
    }

    async fn committed(&self) {
        self.shared.persist().await;
        if let Some(sync) = &self.sync {
            sync.schedule();
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
