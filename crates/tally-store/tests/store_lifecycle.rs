//! Local behaviour of the store: ids, trash lifecycle, persistence, reads.

use std::sync::Arc;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;
use tally_core::entities::{Task, TaskDraft};
use tally_core::enums::{Priority, TaskStatus};
use tally_core::errors::CoreError;
use tally_core::query::{DateRange, TaskFilter};
use tally_core::updates::TaskPatchBuilder;
use tally_local::{FileStore, KeyValueStore, MemoryStore, StorageKey};
use tally_store::{StoreError, TaskRepository, TaskStore};

fn ids(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|task| task.id.clone()).collect()
}

async fn store_with(titles: &[&str]) -> (TaskStore, Arc<MemoryStore>) {
    let persistence = Arc::new(MemoryStore::new());
    let store = TaskStore::open(persistence.clone()).await;
    for title in titles {
        store.add_task(TaskDraft::new(*title)).await.unwrap();
    }
    (store, persistence)
}

#[tokio::test]
async fn ids_are_sequential_and_never_reused() {
    let (store, _) = store_with(&["a", "b", "c"]).await;
    assert_eq!(ids(&store.active_tasks()), vec!["000003", "000002", "000001"]);

    store.delete_task("000003").await.unwrap();
    let next = store.add_task(TaskDraft::new("d")).await.unwrap();
    assert_eq!(next.id, "000004");

    store.permanently_delete_task("000003").await.unwrap();
    let after_purge = store.add_task(TaskDraft::new("e")).await.unwrap();
    assert_eq!(after_purge.id, "000005");
}

#[tokio::test]
async fn delete_then_restore_is_identity() {
    let (store, _) = store_with(&["a", "b", "c"]).await;
    let original = store.get_task("000002").unwrap();

    let trashed = store.delete_task("000002").await.unwrap();
    assert_eq!(trashed, original);
    assert!(store.get_task("000002").is_none());
    assert_eq!(store.get_trashed("000002"), Some(original.clone()));

    let restored = store.restore_task("000002").await.unwrap();
    assert_eq!(restored, original);
    assert_eq!(ids(&store.active_tasks()), vec!["000002", "000003", "000001"]);
    assert!(store.trashed_tasks().is_empty());
}

#[tokio::test]
async fn trash_is_most_recent_first_and_disjoint() {
    let (store, _) = store_with(&["a", "b", "c"]).await;
    store.delete_task("000001").await;
    store.delete_task("000003").await;
    assert_eq!(ids(&store.trashed_tasks()), vec!["000003", "000001"]);

    let snapshot = store.snapshot();
    for task in &snapshot.active {
        assert!(snapshot.find_trashed(&task.id).is_none());
    }
}

#[tokio::test]
async fn update_never_touches_trash() {
    let (store, _) = store_with(&["a"]).await;
    let mut task = store.delete_task("000001").await.unwrap();
    task.title = "resurrected".into();

    assert_eq!(store.update_task(task).await.unwrap(), None);
    assert!(store.active_tasks().is_empty());
    assert_eq!(store.get_trashed("000001").unwrap().title, "a");
}

#[tokio::test]
async fn update_replaces_in_place() {
    let (store, _) = store_with(&["a", "b"]).await;
    let mut task = store.get_task("000001").unwrap();
    task.status = TaskStatus::InProgress;
    task.notes = "halfway".into();

    let updated = store.update_task(task.clone()).await.unwrap();
    assert_eq!(updated, Some(task));
    assert_eq!(ids(&store.active_tasks()), vec!["000002", "000001"]);
}

#[tokio::test]
async fn blank_title_is_rejected_without_side_effects() {
    let (store, persistence) = store_with(&["a"]).await;
    let writes = persistence.write_count();

    let err = store.add_task(TaskDraft::new("  ")).await.unwrap_err();
    assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));

    let mut task = store.get_task("000001").unwrap();
    task.title = String::new();
    assert!(store.update_task(task).await.is_err());

    assert_eq!(store.get_task("000001").unwrap().title, "a");
    assert_eq!(store.active_tasks().len(), 1);
    assert_eq!(persistence.write_count(), writes);
}

#[tokio::test]
async fn unknown_ids_do_not_persist() {
    let (store, persistence) = store_with(&["a"]).await;
    let writes = persistence.write_count();

    assert!(store.delete_task("999999").await.is_none());
    assert!(store.restore_task("000001").await.is_none());
    assert!(store.permanently_delete_task("000001").await.is_none());
    assert_eq!(store.clear_trash().await, 0);
    assert_eq!(
        store
            .patch_task("999999", TaskPatchBuilder::new().notes("x").build())
            .await
            .unwrap(),
        None
    );

    assert_eq!(persistence.write_count(), writes);
}

#[tokio::test]
async fn every_mutation_writes_both_collections() {
    let (store, persistence) = store_with(&["a", "b"]).await;
    store.delete_task("000001").await;

    let active = persistence.peek(StorageKey::Tasks).unwrap();
    let trashed = persistence.peek(StorageKey::TrashedTasks).unwrap();
    assert_eq!(active.as_array().unwrap().len(), 1);
    assert_eq!(trashed[0]["id"], "000001");
}

#[tokio::test]
async fn patch_marks_done() {
    let (store, _) = store_with(&["a"]).await;
    let done = store
        .patch_task("000001", TaskPatchBuilder::new().status(TaskStatus::Done).build())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.status, TaskStatus::Done);
    assert!(done.progress.is_complete());
}

#[tokio::test]
async fn clear_trash_empties_only_trash() {
    let (store, _) = store_with(&["a", "b", "c"]).await;
    store.delete_task("000001").await;
    store.delete_task("000002").await;
    assert_eq!(store.clear_trash().await, 2);
    assert!(store.trashed_tasks().is_empty());
    assert_eq!(ids(&store.active_tasks()), vec!["000003"]);
}

#[tokio::test]
async fn file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    {
        let persistence = Arc::new(FileStore::open(dir.path()).await.unwrap());
        let store = TaskStore::open(persistence).await;
        store.add_task(TaskDraft::new("keep me")).await.unwrap();
        store.add_task(TaskDraft::new("trash me")).await.unwrap();
        store.delete_task("000002").await;
    }

    let persistence = Arc::new(FileStore::open(dir.path()).await.unwrap());
    let reopened = TaskStore::open(persistence).await;
    assert_eq!(ids(&reopened.active_tasks()), vec!["000001"]);
    assert_eq!(ids(&reopened.trashed_tasks()), vec!["000002"]);
    let next = reopened.add_task(TaskDraft::new("third")).await.unwrap();
    assert_eq!(next.id, "000003");
}

#[tokio::test]
async fn load_repairs_and_tolerates_bad_data() {
    let task = |id: &str| json!({"id": id, "createdDate": "2024-01-01", "title": format!("t{id}")});
    let persistence = MemoryStore::new()
        .with_value(StorageKey::Tasks, json!([task("000001"), {"broken": true}, task("000002")]))
        .with_value(StorageKey::TrashedTasks, json!([task("000002"), task("000003")]));

    let store = TaskStore::open(Arc::new(persistence)).await;
    assert_eq!(ids(&store.active_tasks()), vec!["000001", "000002"]);
    assert_eq!(ids(&store.trashed_tasks()), vec!["000003"]);
}

#[tokio::test]
async fn records_without_ids_all_survive_load() {
    let legacy = |title: &str| json!({"createdDate": "2024-01-01", "title": title});
    let persistence = MemoryStore::new().with_value(
        StorageKey::Tasks,
        json!([legacy("first"), {"id": "000002", "createdDate": "2024-01-01", "title": "numbered"}, legacy("second")]),
    );

    let store = TaskStore::open(Arc::new(persistence)).await;
    assert_eq!(ids(&store.active_tasks()), vec!["000003", "000002", "000004"]);
    assert_eq!(store.get_task("000004").unwrap().title, "second");

    let next = store.add_task(TaskDraft::new("new")).await.unwrap();
    assert_eq!(next.id, "000005");
}

#[tokio::test]
async fn malformed_collections_load_as_empty() {
    let persistence = MemoryStore::new()
        .with_value(StorageKey::Tasks, json!({"not": "a list"}))
        .with_value(StorageKey::TrashedTasks, json!("nope"));
    let store = TaskStore::open(Arc::new(persistence)).await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn queries_and_summary_ignore_trash() {
    let (store, _) = store_with(&[]).await;
    let date = |d| NaiveDate::from_ymd_opt(2024, 4, d).unwrap();
    for (title, day, priority) in [
        ("alpha", 1, Priority::Critical),
        ("beta", 2, Priority::Minor),
        ("gamma", 3, Priority::Critical),
    ] {
        let mut draft = TaskDraft::new(title);
        draft.created_date = Some(date(day));
        draft.priority = priority;
        store.add_task(draft).await.unwrap();
    }
    store.delete_task("000003").await;

    let critical = store.query(&TaskFilter {
        priority: Some(Priority::Critical),
        ..TaskFilter::default()
    });
    assert_eq!(ids(&critical), vec!["000001"]);

    let summary = store.summary(Some(DateRange::new(Some(date(1)), Some(date(3))).unwrap()));
    assert_eq!(summary.total, 2);
    assert_eq!(summary.by_priority.critical, 1);
}

#[tokio::test]
async fn local_only_store_flush_is_noop() {
    let (store, _) = store_with(&["a"]).await;
    assert!(store.flush().await.unwrap().is_none());
}

#[tokio::test]
async fn works_behind_the_repository_trait() {
    let persistence: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let repo: Arc<dyn TaskRepository> = Arc::new(TaskStore::open(persistence).await);
    let task = repo.add_task(TaskDraft::new("via trait")).await.unwrap();
    assert_eq!(repo.get_task(&task.id).unwrap().title, "via trait");
    assert!(repo.sync_phase().is_none());
}

#[tokio::test]
async fn failed_local_write_keeps_memory_and_heals_on_next_mutation() {
    let persistence = Arc::new(MemoryStore::new());
    let store = TaskStore::open(persistence.clone()).await;

    persistence.fail_next_write();
    let first = store.add_task(TaskDraft::new("written while disk failed")).await.unwrap();
    assert_eq!(first.id, "000001");
    assert_eq!(ids(&store.active_tasks()), vec!["000001"]);
    assert!(persistence.peek(StorageKey::Tasks).is_none());

    store.add_task(TaskDraft::new("next")).await.unwrap();
    assert_eq!(ids(&store.active_tasks()), vec!["000002", "000001"]);
    let stored = persistence.peek(StorageKey::Tasks).unwrap();
    let stored_ids: Vec<&str> = stored
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["id"].as_str().unwrap())
        .collect();
    assert_eq!(stored_ids, vec!["000002", "000001"]);

    let reopened = TaskStore::open(persistence).await;
    assert_eq!(ids(&reopened.active_tasks()), vec!["000002", "000001"]);
}
