//! Status and priority enums for tasks.
//!
//! Both enums serialize as `snake_case`. Deserialization also accepts the
//! display spellings written by older clients (`"In Progress"`, `"Planned"`,
//! ...) so remote snapshots and imported lists normalize on read.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

/// Status of a task.
///
/// ```text
/// planned → in_progress → done
/// ```
///
/// Transitions are not enforced; any status may follow any other.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    #[serde(alias = "Planned")]
    Planned,
    #[serde(alias = "In Progress", alias = "InProgress", alias = "in-progress")]
    InProgress,
    #[serde(alias = "Done")]
    Done,
}

impl TaskStatus {
    pub const ALL: [Self; 3] = [Self::Planned, Self::InProgress, Self::Done];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Priority of a task, highest first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[serde(alias = "Critical")]
    Critical,
    #[default]
    #[serde(alias = "Important")]
    Important,
    #[serde(alias = "Minor")]
    Minor,
}

impl Priority {
    pub const ALL: [Self; 3] = [Self::Critical, Self::Important, Self::Minor];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Important => "important",
            Self::Minor => "minor",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
