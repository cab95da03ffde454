//! Sequential task id allocation.
//!
//! Ids are 6-digit zero-padded decimal strings (`"000001"`). The next id is
//! one past the largest numeric id among every known task, active or trashed,
//! so an id is never handed out twice even after its task is deleted.

use crate::entities::Task;

/// Width of a formatted task id.
pub const ID_WIDTH: usize = 6;

/// Numeric value of an id; anything unparseable counts as 0.
#[must_use]
pub fn parse_numeric_id(id: &str) -> u64 {
    id.trim().parse::<u64>().unwrap_or(0)
}

/// Format a numeric id with zero padding.
#[must_use]
pub fn format_id(value: u64) -> String {
    format!("{value:0width$}", width = ID_WIDTH)
}

/// Compute the id for a new task from every existing task.
pub fn next_id<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
    let max = tasks
        .into_iter()
        .map(|task| parse_numeric_id(&task.id))
        .max()
        .unwrap_or(0);
    format_id(max.saturating_add(1))
}
