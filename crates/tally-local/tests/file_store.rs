use pretty_assertions::assert_eq;
use serde_json::json;
use tally_local::{FileStore, KeyValueStore, LocalError, StorageKey};

#[tokio::test]
async fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let tasks = json!([{"id": "000001", "title": "Buy milk", "createdDate": "2024-01-01"}]);

    {
        let store = FileStore::open(dir.path()).await.unwrap();
        store.set(StorageKey::Tasks, &tasks).await.unwrap();
        store.set(StorageKey::TrashedTasks, &json!([])).await.unwrap();
    }

    let reopened = FileStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.get(StorageKey::Tasks).await.unwrap(), Some(tasks));
    assert_eq!(reopened.get(StorageKey::TrashedTasks).await.unwrap(), Some(json!([])));
    assert!(reopened.get(StorageKey::Session).await.unwrap().is_none());
}

#[tokio::test]
async fn one_file_per_key_and_no_temp_left_behind() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    store.set(StorageKey::Session, &json!({"accessToken": "abc"})).await.unwrap();
    store.set(StorageKey::Session, &json!({"accessToken": "def"})).await.unwrap();

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["session.json"]);
    assert_eq!(
        store.get(StorageKey::Session).await.unwrap(),
        Some(json!({"accessToken": "def"}))
    );
}

#[tokio::test]
async fn open_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    let store = FileStore::open(&nested).await.unwrap();
    store.set(StorageKey::Tasks, &json!([])).await.unwrap();
    assert!(nested.join("tasks.json").exists());
}

#[tokio::test]
async fn delete_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    store.delete(StorageKey::Tasks).await.unwrap();
    store.set(StorageKey::Tasks, &json!([])).await.unwrap();
    store.delete(StorageKey::Tasks).await.unwrap();
    assert!(store.get(StorageKey::Tasks).await.unwrap().is_none());
}

#[tokio::test]
async fn garbage_file_reports_corruption() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tasks.json"), b"{not json").unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    let err = store.get(StorageKey::Tasks).await.unwrap_err();
    assert!(matches!(err, LocalError::Corrupt { key: "tasks", .. }));
}
