use std::sync::Arc;

use chrono::Duration;
use pretty_assertions::assert_eq;
use serde_json::json;
use tally_auth::{CredentialProvider, CredentialSource, Session, SessionCredentials};
use tally_local::{FileStore, KeyValueStore, MemoryStore, StorageKey};

#[tokio::test]
async fn signed_out_by_default() {
    let creds = SessionCredentials::load(Arc::new(MemoryStore::new()), None).await;
    assert!(!creds.has_valid_credential());
    assert_eq!(creds.status().source, CredentialSource::None);
}

#[tokio::test]
async fn login_persists_and_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path()).await.unwrap());

    let creds = SessionCredentials::load(Arc::clone(&store), None).await;
    let session = Session::new("ya29.abc", Some(Duration::hours(1)), Some("me@example.com".into())).unwrap();
    creds.login(session).await.unwrap();
    assert_eq!(creds.credential().as_deref(), Some("ya29.abc"));

    let reloaded = SessionCredentials::load(store, None).await;
    assert_eq!(reloaded.credential().as_deref(), Some("ya29.abc"));
    assert_eq!(reloaded.status().account.as_deref(), Some("me@example.com"));
}

#[tokio::test]
async fn config_token_takes_precedence() {
    let store = MemoryStore::new().with_value(StorageKey::Session, json!({"accessToken": "from-session"}));
    let creds = SessionCredentials::load(Arc::new(store), Some("from-config".into())).await;
    assert_eq!(creds.credential().as_deref(), Some("from-config"));
    assert_eq!(creds.status().source, CredentialSource::Config);
}

#[tokio::test]
async fn blank_config_token_is_ignored() {
    let store = MemoryStore::new().with_value(StorageKey::Session, json!({"accessToken": "from-session"}));
    let creds = SessionCredentials::load(Arc::new(store), Some("   ".into())).await;
    assert_eq!(creds.credential().as_deref(), Some("from-session"));
}

#[tokio::test]
async fn expired_session_is_not_usable() {
    let store = MemoryStore::new().with_value(
        StorageKey::Session,
        json!({"accessToken": "old", "expiresAt": "2020-01-01T00:00:00Z"}),
    );
    let creds = SessionCredentials::load(Arc::new(store), None).await;
    assert!(!creds.has_valid_credential());
    let status = creds.status();
    assert_eq!(status.source, CredentialSource::Session);
    assert!(!status.valid);
}

#[tokio::test]
async fn malformed_session_reads_as_signed_out() {
    let store = MemoryStore::new().with_value(StorageKey::Session, json!("garbage"));
    let creds = SessionCredentials::load(Arc::new(store), None).await;
    assert!(!creds.has_valid_credential());
}

#[tokio::test]
async fn invalidation_lasts_until_next_login() {
    let creds = SessionCredentials::load(Arc::new(MemoryStore::new()), None).await;
    creds.login(Session::new("first", None, None).unwrap()).await.unwrap();

    creds.invalidate();
    assert!(!creds.has_valid_credential());
    assert!(creds.status().invalidated);

    creds.login(Session::new("second", None, None).unwrap()).await.unwrap();
    assert_eq!(creds.credential().as_deref(), Some("second"));
}

#[tokio::test]
async fn logout_removes_session() {
    let store = Arc::new(MemoryStore::new());
    let creds = SessionCredentials::load(store.clone(), None).await;
    creds.login(Session::new("tok", None, None).unwrap()).await.unwrap();
    creds.logout().await.unwrap();
    assert!(!creds.has_valid_credential());
    assert!(store.peek(StorageKey::Session).is_none());
}
