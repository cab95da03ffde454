use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{Priority, TaskStatus};
use crate::errors::CoreError;
use crate::progress::Progress;

/// A tracked unit of personal work.
///
/// `id` is assigned by [`crate::ids::next_id`] on creation and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default)]
    pub id: String,
    pub created_date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub notes: String,
}

impl Task {
    /// Whether the deadline has passed on `today` without the task being done.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_done() && self.deadline.is_some_and(|deadline| deadline < today)
    }

    /// Check the field constraints that callers can violate.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the title is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_title(&self.title)
    }
}

/// Everything needed to create a task except its id.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub progress: Progress,
    #[serde(default)]
    pub notes: String,
    /// Defaults to the local date at creation time.
    #[serde(default)]
    pub created_date: Option<NaiveDate>,
}

impl TaskDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Materialize the draft under an allocated id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] if the title is blank.
    pub fn into_task(self, id: String, today: NaiveDate) -> Result<Task, CoreError> {
        validate_title(&self.title)?;
        Ok(Task {
            id,
            created_date: self.created_date.unwrap_or(today),
            title: self.title.trim().to_string(),
            description: self.description,
            status: self.status,
            priority: self.priority,
            deadline: self.deadline,
            progress: self.progress,
            notes: self.notes,
        })
    }
}

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("task title must not be empty".into()));
    }
    Ok(())
}
