use chrono::{DateTime, Utc};
use serde::Serialize;
use tally_store::{SyncError, SyncOutcome};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    Synced,
    LocalOnly,
    NoCredential,
    Failed,
}

#[derive(Debug, Serialize)]
pub struct SyncReport {
    pub status: SyncStatus,
    /// True when the remote document replaced local tasks.
    pub pulled: bool,
    pub remote_file: Option<String>,
    pub active: Option<usize>,
    pub trashed: Option<usize>,
    pub synced_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub note: String,
}

/// Handle `tly sync`: run a cycle now and report how it went.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let report = build_sync_report(ctx.repo.flush().await);
    output(&report, flags.format)?;
    if report.status == SyncStatus::Failed {
        anyhow::bail!("sync failed");
    }
    Ok(())
}

/// Push a just-written change before the process exits.
///
/// Local writes have already succeeded, so failures are logged rather than
/// returned. Only runs when the remote was resolved before the write; a
/// flush that resolved it now would replace the write with the remote copy.
pub async fn flush_after_write(ctx: &AppContext) {
    if !ctx.remote_ready {
        if ctx.sync_enabled {
            tracing::info!("remote not resolved this run; change saved locally only");
        }
        return;
    }
    let report = build_sync_report(ctx.repo.flush().await);
    match report.status {
        SyncStatus::Synced | SyncStatus::LocalOnly => {
            tracing::debug!(remote_file = ?report.remote_file, "change synced");
        }
        SyncStatus::NoCredential => {
            tracing::info!("not signed in; change saved locally only");
        }
        SyncStatus::Failed => {
            tracing::warn!(
                error = report.error.as_deref().unwrap_or_default(),
                "sync failed; change saved locally"
            );
        }
    }
}

pub fn build_sync_report(result: Result<Option<SyncOutcome>, SyncError>) -> SyncReport {
    let empty = SyncReport {
        status: SyncStatus::LocalOnly,
        pulled: false,
        remote_file: None,
        active: None,
        trashed: None,
        synced_at: None,
        error: None,
        note: String::new(),
    };

    match result {
        Ok(Some(outcome)) => SyncReport {
            status: SyncStatus::Synced,
            pulled: outcome.pulled,
            remote_file: Some(outcome.handle.to_string()),
            active: Some(outcome.uploaded_active),
            trashed: Some(outcome.uploaded_trashed),
            synced_at: Some(outcome.synced_at),
            note: if outcome.pulled {
                "Remote tasks replaced local tasks, then local state was uploaded.".to_string()
            } else {
                "Local tasks uploaded.".to_string()
            },
            ..empty
        },
        Ok(None) => SyncReport {
            note: "Sync is disabled; tasks are stored locally only.".to_string(),
            ..empty
        },
        Err(SyncError::NoCredential) => SyncReport {
            status: SyncStatus::NoCredential,
            error: Some(SyncError::NoCredential.to_string()),
            note: "Tasks are stored locally until you sign in.".to_string(),
            ..empty
        },
        Err(error) => SyncReport {
            status: SyncStatus::Failed,
            error: Some(error.to_string()),
            note: "Local tasks are unchanged; the next change or `tly sync` retries.".to_string(),
            ..empty
        },
    }
}
