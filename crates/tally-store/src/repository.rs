//! The store contract consumers program against.

use async_trait::async_trait;
use tally_core::entities::{Task, TaskDraft, TaskSet};
use tally_core::query::{DateRange, TaskFilter, TaskSummary};
use tally_core::updates::TaskPatch;

use crate::error::{StoreError, SyncError};
use crate::store::TaskStore;
use crate::sync::{SyncOutcome, SyncPhase};

/// Task CRUD, trash lifecycle, and dashboard reads.
///
/// See [`TaskStore`] for the semantics of each operation.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn add_task(&self, draft: TaskDraft) -> Result<Task, StoreError>;
    async fn update_task(&self, task: Task) -> Result<Option<Task>, StoreError>;
    async fn patch_task(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>, StoreError>;
    async fn delete_task(&self, id: &str) -> Option<Task>;
    async fn restore_task(&self, id: &str) -> Option<Task>;
    async fn permanently_delete_task(&self, id: &str) -> Option<Task>;
    async fn clear_trash(&self) -> usize;

    fn get_task(&self, id: &str) -> Option<Task>;
    fn get_trashed(&self, id: &str) -> Option<Task>;
    fn active_tasks(&self) -> Vec<Task>;
    fn trashed_tasks(&self) -> Vec<Task>;
    fn snapshot(&self) -> TaskSet;
    fn query(&self, filter: &TaskFilter) -> Vec<Task>;
    fn summary(&self, range: Option<DateRange>) -> TaskSummary;

    /// `None` when the repository does not sync.
    fn sync_phase(&self) -> Option<SyncPhase>;
    async fn pull(&self) -> Result<Option<bool>, SyncError>;
    async fn flush(&self) -> Result<Option<SyncOutcome>, SyncError>;
}

#[async_trait]
impl TaskRepository for TaskStore {
    async fn add_task(&self, draft: TaskDraft) -> Result<Task, StoreError> {
        Self::add_task(self, draft).await
    }

    async fn update_task(&self, task: Task) -> Result<Option<Task>, StoreError> {
        Self::update_task(self, task).await
    }

    async fn patch_task(&self, id: &str, patch: TaskPatch) -> Result<Option<Task>, StoreError> {
        Self::patch_task(self, id, patch).await
    }

    async fn delete_task(&self, id: &str) -> Option<Task> {
        Self::delete_task(self, id).await
    }

    async fn restore_task(&self, id: &str) -> Option<Task> {
        Self::restore_task(self, id).await
    }

    async fn permanently_delete_task(&self, id: &str) -> Option<Task> {
        Self::permanently_delete_task(self, id).await
    }

    async fn clear_trash(&self) -> usize {
        Self::clear_trash(self).await
    }

    fn get_task(&self, id: &str) -> Option<Task> {
        Self::get_task(self, id)
    }

    fn get_trashed(&self, id: &str) -> Option<Task> {
        Self::get_trashed(self, id)
    }

    fn active_tasks(&self) -> Vec<Task> {
        Self::active_tasks(self)
    }

    fn trashed_tasks(&self) -> Vec<Task> {
        Self::trashed_tasks(self)
    }

    fn snapshot(&self) -> TaskSet {
        Self::snapshot(self)
    }

    fn query(&self, filter: &TaskFilter) -> Vec<Task> {
        Self::query(self, filter)
    }

    fn summary(&self, range: Option<DateRange>) -> TaskSummary {
        Self::summary(self, range)
    }

    fn sync_phase(&self) -> Option<SyncPhase> {
        self.sync_engine().map(crate::SyncEngine::phase)
    }

    async fn pull(&self) -> Result<Option<bool>, SyncError> {
        Self::pull(self).await
    }

    async fn flush(&self) -> Result<Option<SyncOutcome>, SyncError> {
        Self::flush(self).await
    }
}
