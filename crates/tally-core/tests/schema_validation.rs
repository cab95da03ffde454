//! JsonSchema validation for the shapes that leave the process
//! (local storage values and the remote document).

use chrono::{NaiveDate, TimeZone, Utc};
use schemars::schema_for;
use tally_core::document::RemoteDocument;
use tally_core::entities::{Task, TaskDraft, TaskSet};
use tally_core::enums::{Priority, TaskStatus};
use tally_core::progress::Progress;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn sample_task(id: &str) -> Task {
    let mut draft = TaskDraft::new("Renew passport");
    draft.description = "Photos + form".into();
    draft.status = TaskStatus::InProgress;
    draft.priority = Priority::Critical;
    draft.deadline = NaiveDate::from_ymd_opt(2024, 6, 30);
    draft.progress = Progress::from_percent(40);
    draft.notes = "Office opens at 9".into();
    draft
        .into_task(id.into(), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        .unwrap()
}

#[test]
fn task_matches_its_schema() {
    let schema = serde_json::to_value(schema_for!(Task)).unwrap();
    let instance = serde_json::to_value(sample_task("000001")).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "task schema errors: {errors:?}");
}

#[test]
fn remote_document_matches_its_schema() {
    let set = TaskSet::new(vec![sample_task("000002")], vec![sample_task("000001")]);
    let now = Utc.with_ymd_and_hms(2024, 6, 2, 8, 0, 0).unwrap();
    let doc = RemoteDocument::from_task_set(&set, now);

    let schema = serde_json::to_value(schema_for!(RemoteDocument)).unwrap();
    let instance = serde_json::to_value(&doc).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "document schema errors: {errors:?}");

    let recovered = RemoteDocument::from_value(instance).unwrap();
    assert_eq!(recovered, doc);
}

#[test]
fn out_of_range_progress_fails_schema() {
    let schema = serde_json::to_value(schema_for!(Task)).unwrap();
    let mut instance = serde_json::to_value(sample_task("000001")).unwrap();
    instance["progress"] = serde_json::json!(140);
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}
