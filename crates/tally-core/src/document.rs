//! The JSON document stored by the remote backend.
//!
//! One document per account holds the whole task set:
//!
//! ```json
//! { "tasks": [...], "trashedTasks": [...], "lastSync": "2024-03-01T10:00:00Z" }
//! ```
//!
//! There is no version field. Every upload replaces the document wholesale.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::{Task, TaskSet};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RemoteDocument {
    pub tasks: Vec<Task>,
    #[serde(default, alias = "trashed", alias = "deletedTasks")]
    pub trashed_tasks: Vec<Task>,
    #[serde(default, alias = "date", deserialize_with = "lenient_timestamp")]
    #[schemars(with = "Option<DateTime<Utc>>")]
    pub last_sync: Option<DateTime<Utc>>,
}

impl RemoteDocument {
    #[must_use]
    pub fn from_task_set(set: &TaskSet, now: DateTime<Utc>) -> Self {
        Self {
            tasks: set.active.clone(),
            trashed_tasks: set.trashed.clone(),
            last_sync: Some(now),
        }
    }

    /// Interpret a downloaded payload.
    ///
    /// Returns `None` when the payload has no usable task list, which callers
    /// treat as "no remote data".
    #[must_use]
    pub fn from_value(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    #[must_use]
    pub fn into_task_set(self) -> TaskSet {
        TaskSet::from_parts(self.tasks, self.trashed_tasks)
    }
}

/// Accept RFC 3339 strings or epoch milliseconds; anything else reads as absent.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(raw)) => DateTime::parse_from_rfc3339(&raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(serde_json::Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn task_json(id: &str, title: &str) -> serde_json::Value {
        json!({"id": id, "createdDate": "2024-01-02", "title": title, "status": "planned", "priority": "minor"})
    }

    #[test]
    fn accepts_legacy_field_names() {
        let doc = RemoteDocument::from_value(json!({
            "tasks": [task_json("000001", "A")],
            "deletedTasks": [task_json("000002", "B")],
            "date": 1_709_287_200_000_i64,
        }))
        .unwrap();
        assert_eq!(doc.tasks.len(), 1);
        assert_eq!(doc.trashed_tasks[0].id, "000002");
        assert_eq!(doc.last_sync.unwrap().timestamp(), 1_709_287_200);
    }

    #[test]
    fn missing_task_list_is_unusable() {
        assert!(RemoteDocument::from_value(json!({"trashedTasks": []})).is_none());
        assert!(RemoteDocument::from_value(json!("not an object")).is_none());
        assert!(RemoteDocument::from_value(json!({"tasks": "nope"})).is_none());
    }

    #[test]
    fn missing_trash_defaults_to_empty() {
        let doc = RemoteDocument::from_value(json!({"tasks": [task_json("000001", "A")]})).unwrap();
        assert!(doc.trashed_tasks.is_empty());
        assert!(doc.last_sync.is_none());
    }

    #[test]
    fn serializes_canonical_names() {
        let set = TaskSet::default();
        let now = DateTime::parse_from_rfc3339("2024-03-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let value = serde_json::to_value(RemoteDocument::from_task_set(&set, now)).unwrap();
        assert_eq!(
            value,
            json!({"tasks": [], "trashedTasks": [], "lastSync": "2024-03-01T10:00:00Z"})
        );
    }
}
