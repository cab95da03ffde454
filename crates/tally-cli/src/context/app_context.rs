use std::sync::Arc;

use anyhow::Context;
use tally_auth::{CredentialProvider, SessionCredentials};
use tally_config::TallyConfig;
use tally_local::{FileStore, KeyValueStore};
use tally_remote::{DriveClient, DriveSettings, RemoteStore};
use tally_store::{SyncError, SyncSettings, TaskRepository, TaskStore};

use crate::cli::GlobalFlags;

/// Shared runtime state for command handlers.
pub struct AppContext {
    pub repo: Arc<dyn TaskRepository>,
    pub config: TallyConfig,
    /// False under `--offline` or `[sync] enabled = false`.
    pub sync_enabled: bool,
    /// True once the remote document was resolved at startup. Writes are
    /// only pushed after that, so a first-contact pull never lands on top
    /// of this run's own change.
    pub remote_ready: bool,
}

impl AppContext {
    pub async fn init(config: TallyConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let persistence = open_persistence(&config).await?;
        let sync_enabled = config.sync.enabled && !flags.offline;

        let repo: Arc<dyn TaskRepository> = if sync_enabled {
            let credentials: Arc<dyn CredentialProvider> = Arc::new(
                SessionCredentials::load(
                    Arc::clone(&persistence),
                    config.auth.token().map(ToString::to_string),
                )
                .await,
            );
            let remote: Arc<dyn RemoteStore> = Arc::new(
                DriveClient::new(&DriveSettings {
                    base_url: config.sync.api_base_url.trim_end_matches('/').to_string(),
                    timeout: config.sync.timeout(),
                    ..DriveSettings::default()
                })
                .context("failed to build sync HTTP client")?,
            );
            let settings = SyncSettings {
                debounce: config.sync.debounce(),
                file_name: config.sync.file_name.clone(),
            };
            Arc::new(TaskStore::open_synced(persistence, remote, credentials, settings).await)
        } else {
            tracing::debug!("sync disabled; opening local-only store");
            Arc::new(TaskStore::open(persistence).await)
        };

        let remote_ready = sync_enabled && pull_remote(repo.as_ref()).await;

        Ok(Self {
            repo,
            config,
            sync_enabled,
            remote_ready,
        })
    }
}

/// Take the remote document as the starting state for this run.
async fn pull_remote(repo: &dyn TaskRepository) -> bool {
    match repo.pull().await {
        Ok(pulled) => {
            tracing::debug!(?pulled, "remote document resolved");
            true
        }
        Err(SyncError::NoCredential) => {
            tracing::debug!("not signed in; working locally");
            false
        }
        Err(error) => {
            tracing::warn!(%error, "could not reach remote; changes stay local this run");
            false
        }
    }
}

/// Open the file-backed key-value store under the configured data directory.
pub async fn open_persistence(config: &TallyConfig) -> anyhow::Result<Arc<dyn KeyValueStore>> {
    let data_dir = config.storage.resolved_data_dir();
    let store = FileStore::open(&data_dir)
        .await
        .with_context(|| format!("failed to open data directory {}", data_dir.display()))?;
    Ok(Arc::new(store))
}
