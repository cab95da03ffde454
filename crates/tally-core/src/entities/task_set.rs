use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Task;
use crate::ids;

/// The aggregate root: active tasks and the trash.
///
/// Both collections are ordered newest first. A task id lives in at most one
/// of them; every method that moves a task removes it from one side and
/// inserts it into the other in a single `&mut self` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskSet {
    pub active: Vec<Task>,
    pub trashed: Vec<Task>,
}

impl TaskSet {
    #[must_use]
    pub const fn new(active: Vec<Task>, trashed: Vec<Task>) -> Self {
        Self { active, trashed }
    }

    /// Build a set from raw collections, repairing ids.
    ///
    /// Records without an id get fresh ids past the largest existing one, in
    /// collection order. Duplicate ids inside one collection keep their first
    /// occurrence, and an id present in both collections is kept in `active`
    /// only.
    #[must_use]
    pub fn from_parts(active: Vec<Task>, trashed: Vec<Task>) -> Self {
        let mut last_id = active
            .iter()
            .chain(&trashed)
            .map(|task| ids::parse_numeric_id(&task.id))
            .max()
            .unwrap_or(0);
        let mut seen = HashSet::new();
        let mut keep = |mut task: Task| {
            if task.id.trim().is_empty() {
                last_id += 1;
                task.id = ids::format_id(last_id);
            }
            seen.insert(task.id.clone()).then_some(task)
        };
        let active: Vec<Task> = active.into_iter().filter_map(&mut keep).collect();
        let trashed: Vec<Task> = trashed.into_iter().filter_map(&mut keep).collect();
        Self { active, trashed }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.trashed.is_empty()
    }

    /// Iterate over active and trashed tasks.
    pub fn all_tasks(&self) -> impl Iterator<Item = &Task> {
        self.active.iter().chain(self.trashed.iter())
    }

    /// Allocate the next id over both collections.
    #[must_use]
    pub fn next_id(&self) -> String {
        ids::next_id(self.all_tasks())
    }

    #[must_use]
    pub fn find_active(&self, id: &str) -> Option<&Task> {
        self.active.iter().find(|task| task.id == id)
    }

    #[must_use]
    pub fn find_trashed(&self, id: &str) -> Option<&Task> {
        self.trashed.iter().find(|task| task.id == id)
    }

    /// Prepend a freshly created task to the active list.
    pub fn insert_new(&mut self, task: Task) {
        self.active.insert(0, task);
    }

    /// Replace the active task with the same id. Trashed tasks are untouched.
    pub fn replace_active(&mut self, task: Task) -> Option<&Task> {
        let slot = self.active.iter_mut().find(|existing| existing.id == task.id)?;
        *slot = task;
        Some(&*slot)
    }

    /// Move an active task to the front of the trash.
    pub fn trash(&mut self, id: &str) -> Option<&Task> {
        let index = self.active.iter().position(|task| task.id == id)?;
        let task = self.active.remove(index);
        self.trashed.insert(0, task);
        self.trashed.first()
    }

    /// Move a trashed task back to the front of the active list.
    pub fn restore(&mut self, id: &str) -> Option<&Task> {
        let index = self.trashed.iter().position(|task| task.id == id)?;
        let task = self.trashed.remove(index);
        self.active.insert(0, task);
        self.active.first()
    }

    /// Remove a task from the trash permanently.
    pub fn purge(&mut self, id: &str) -> Option<Task> {
        let index = self.trashed.iter().position(|task| task.id == id)?;
        Some(self.trashed.remove(index))
    }

    /// Empty the trash, returning how many tasks were removed.
    pub fn clear_trash(&mut self) -> usize {
        let removed = self.trashed.len();
        self.trashed.clear();
        removed
    }
}
