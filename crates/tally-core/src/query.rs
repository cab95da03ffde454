//! Dashboard filtering and aggregation.
//!
//! These functions take whatever slice of tasks they are given. Callers pass
//! the active collection only; trashed tasks never reach a dashboard query.

use chrono::NaiveDate;
use serde::Serialize;

use crate::entities::Task;
use crate::enums::{Priority, TaskStatus};
use crate::errors::CoreError;

/// Inclusive range over `createdDate`. An open end matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when `from` is after `to`.
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self, CoreError> {
        if let (Some(from), Some(to)) = (from, to)
            && from > to
        {
            return Err(CoreError::Validation(format!(
                "date range start {from} is after end {to}"
            )));
        }
        Ok(Self { from, to })
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub range: DateRange,
    /// Case-insensitive substring over title, description, and notes.
    pub search: Option<String>,
}

impl TaskFilter {
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        if self.status.is_some_and(|status| task.status != status) {
            return false;
        }
        if self.priority.is_some_and(|priority| task.priority != priority) {
            return false;
        }
        if !self.range.contains(task.created_date) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                [&task.title, &task.description, &task.notes]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }

    /// Clone the matching tasks, preserving order.
    #[must_use]
    pub fn apply(&self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|task| self.matches(task)).cloned().collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub planned: usize,
    pub in_progress: usize,
    pub done: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    pub critical: usize,
    pub important: usize,
    pub minor: usize,
}

/// Aggregate figures for a dashboard view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskSummary {
    pub range: DateRange,
    pub total: usize,
    pub by_status: StatusCounts,
    pub by_priority: PriorityCounts,
    pub overdue: usize,
    /// Mean progress in percent, 0 when there are no tasks.
    pub average_progress: f64,
    /// Share of tasks that are done, in `0.0..=1.0`.
    pub completion_rate: f64,
}

impl TaskSummary {
    #[must_use]
    pub fn compute(tasks: &[Task], range: DateRange, today: NaiveDate) -> Self {
        let mut summary = Self {
            range,
            ..Self::default()
        };
        let mut progress_total: u64 = 0;

        for task in tasks.iter().filter(|task| range.contains(task.created_date)) {
            summary.total += 1;
            progress_total += u64::from(task.progress.percent());
            match task.status {
                TaskStatus::Planned => summary.by_status.planned += 1,
                TaskStatus::InProgress => summary.by_status.in_progress += 1,
                TaskStatus::Done => summary.by_status.done += 1,
            }
            match task.priority {
                Priority::Critical => summary.by_priority.critical += 1,
                Priority::Important => summary.by_priority.important += 1,
                Priority::Minor => summary.by_priority.minor += 1,
            }
            if task.is_overdue(today) {
                summary.overdue += 1;
            }
        }

        if summary.total > 0 {
            #[allow(clippy::cast_precision_loss)]
            let total = summary.total as f64;
            #[allow(clippy::cast_precision_loss)]
            let progress_total = progress_total as f64;
            #[allow(clippy::cast_precision_loss)]
            let done = summary.by_status.done as f64;
            summary.average_progress = progress_total / total;
            summary.completion_rate = done / total;
        }
        summary
    }
}
