//! Partial task updates.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::Task;
use crate::enums::{Priority, TaskStatus};
use crate::errors::CoreError;
use crate::progress::Progress;

/// A set of field changes to apply to an existing task.
///
/// `None` leaves a field untouched. `deadline` is doubly optional so a patch
/// can clear it.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Progress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl TaskPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch, returning the updated task. The id never changes.
    ///
    /// Marking a task done without an explicit progress also completes its
    /// progress.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the resulting title is blank.
    pub fn apply(self, mut task: Task) -> Result<Task, CoreError> {
        if let Some(title) = self.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(deadline) = self.deadline {
            task.deadline = deadline;
        }
        if let Some(notes) = self.notes {
            task.notes = notes;
        }
        match (self.status, self.progress) {
            (Some(TaskStatus::Done), None) => {
                task.status = TaskStatus::Done;
                task.progress = Progress::COMPLETE;
            }
            (status, progress) => {
                if let Some(status) = status {
                    task.status = status;
                }
                if let Some(progress) = progress {
                    task.progress = progress;
                }
            }
        }
        task.validate()?;
        Ok(task)
    }
}

pub struct TaskPatchBuilder(TaskPatch);

impl Default for TaskPatchBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskPatchBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(TaskPatch::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.0.description = Some(description.into());
        self
    }

    #[must_use]
    pub const fn status(mut self, status: TaskStatus) -> Self {
        self.0.status = Some(status);
        self
    }

    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.0.priority = Some(priority);
        self
    }

    #[must_use]
    pub const fn deadline(mut self, deadline: Option<NaiveDate>) -> Self {
        self.0.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub const fn progress(mut self, progress: Progress) -> Self {
        self.0.progress = Some(progress);
        self
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.0.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn build(self) -> TaskPatch {
        self.0
    }
}
