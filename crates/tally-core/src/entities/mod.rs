//! Entity structs for Tally domain objects.
//!
//! All structs derive `Serialize`, `Deserialize`, and `JsonSchema` and use
//! camelCase field names, matching the document exchanged with the remote
//! backend and the values kept in local storage.

mod task;
mod task_set;

pub use task::{Task, TaskDraft};
pub use task_set::TaskSet;
