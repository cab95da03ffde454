//! Debounced, single-flight replication of the task set.
//!
//! Phases move `Idle -> Scheduled -> InFlight -> Idle`:
//!
//! - [`SyncEngine::schedule`] (re)arms a debounce timer. Re-arming aborts the
//!   previous timer, and a generation counter makes sure only the newest one
//!   can start a cycle.
//! - When the timer fires while a cycle is already running, the fire is
//!   dropped and a rerun flag is set. The running cycle arms exactly one new
//!   timer when it finishes.
//! - A cycle resolves the remote document once per session. If a document
//!   already exists its contents replace the local task set before anything
//!   is uploaded. Every cycle then uploads the whole local set.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use tally_auth::CredentialProvider;
use tally_core::document::RemoteDocument;
use tally_remote::{FileHandle, RemoteError, RemoteStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::SyncError;
use crate::shared::Shared;

#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Quiet period after the last mutation.
    pub debounce: Duration,
    /// Name of the remote document.
    pub file_name: String,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(2),
            file_name: "tally-tasks.json".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Scheduled,
    InFlight,
}

/// Result of one completed cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncOutcome {
    /// Whether the remote document replaced the local task set.
    pub pulled: bool,
    pub handle: FileHandle,
    pub uploaded_active: usize,
    pub uploaded_trashed: usize,
    pub synced_at: DateTime<Utc>,
}

#[derive(Default)]
struct SyncState {
    remote_handle: Option<FileHandle>,
    in_flight: bool,
    pending_timer: Option<JoinHandle<()>>,
    generation: u64,
    rerun: bool,
    last_synced_at: Option<DateTime<Utc>>,
}

impl SyncState {
    const fn phase(&self) -> SyncPhase {
        if self.in_flight {
            SyncPhase::InFlight
        } else if self.pending_timer.is_some() {
            SyncPhase::Scheduled
        } else {
            SyncPhase::Idle
        }
    }

    fn cancel_timer(&mut self) {
        self.generation += 1;
        if let Some(timer) = self.pending_timer.take() {
            timer.abort();
        }
    }
}

struct Inner {
    shared: Arc<Shared>,
    remote: Arc<dyn RemoteStore>,
    credentials: Arc<dyn CredentialProvider>,
    settings: SyncSettings,
    state: Mutex<SyncState>,
    phase: watch::Sender<SyncPhase>,
}

impl Inner {
    fn publish(&self, state: &SyncState) {
        self.phase.send_if_modified(|phase| {
            let next = state.phase();
            let changed = *phase != next;
            *phase = next;
            changed
        });
    }
}

/// Cheap to clone; clones drive the same engine.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<Inner>,
}

impl SyncEngine {
    pub(crate) fn new(
        shared: Arc<Shared>,
        remote: Arc<dyn RemoteStore>,
        credentials: Arc<dyn CredentialProvider>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                shared,
                remote,
                credentials,
                settings,
                state: Mutex::new(SyncState::default()),
                phase: watch::Sender::new(SyncPhase::Idle),
            }),
        }
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        *self.inner.phase.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SyncPhase> {
        self.inner.phase.subscribe()
    }

    #[must_use]
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.inner.state.lock().last_synced_at
    }

    #[must_use]
    pub fn remote_handle(&self) -> Option<FileHandle> {
        self.inner.state.lock().remote_handle.clone()
    }

    #[must_use]
    pub fn settings(&self) -> &SyncSettings {
        &self.inner.settings
    }

    /// Arm or re-arm the debounce timer. Does nothing without a credential.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self) {
        if !self.inner.credentials.has_valid_credential() {
            tracing::debug!("no valid credential; sync not scheduled");
            return;
        }
        let mut state = self.inner.state.lock();
        state.cancel_timer();
        let generation = state.generation;
        let engine = self.clone();
        let debounce = self.inner.settings.debounce;
        state.pending_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            engine.on_timer(generation).await;
        }));
        self.inner.publish(&state);
    }

    async fn on_timer(&self, generation: u64) {
        let guard = {
            let mut state = self.inner.state.lock();
            if state.generation != generation {
                return;
            }
            // Detach: from here on the cycle must not be aborted.
            state.pending_timer = None;
            if state.in_flight {
                tracing::debug!("sync already in flight; deferring");
                state.rerun = true;
                self.inner.publish(&state);
                return;
            }
            self.claim(&mut state)
        };

        match self.run_cycle().await {
            Ok(outcome) => tracing::info!(
                handle = %outcome.handle,
                pulled = outcome.pulled,
                active = outcome.uploaded_active,
                "sync complete"
            ),
            Err(SyncError::NoCredential) => tracing::debug!("credential gone before sync"),
            Err(error) => tracing::warn!(%error, "background sync failed"),
        }
        drop(guard);
    }

    /// Cancel any pending timer, wait for a running cycle to finish, then run
    /// one cycle now.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoCredential`] without touching the remote when
    /// no credential is available, or [`SyncError::Remote`] if the exchange
    /// fails.
    pub async fn flush(&self) -> Result<SyncOutcome, SyncError> {
        if !self.inner.credentials.has_valid_credential() {
            let mut state = self.inner.state.lock();
            state.cancel_timer();
            self.inner.publish(&state);
            return Err(SyncError::NoCredential);
        }

        let guard = self.claim_when_idle(true).await;
        let result = self.run_cycle().await;
        drop(guard);
        result
    }

    /// Resolve the remote document without uploading.
    ///
    /// Call this at the start of a session, before any local mutation, so
    /// the first-contact replacement happens before there is anything local
    /// to lose. Returns whether the remote document replaced local tasks.
    /// Once a handle is cached this is a no-op returning `false`. A pending
    /// debounce timer is left armed.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::NoCredential`] without a credential, or
    /// [`SyncError::Remote`] if the lookup or download fails.
    pub async fn pull(&self) -> Result<bool, SyncError> {
        if !self.inner.credentials.has_valid_credential() {
            return Err(SyncError::NoCredential);
        }
        let guard = self.claim_when_idle(false).await;
        let result = self.pull_cycle().await;
        drop(guard);
        result
    }

    /// Wait for a running cycle to end, then mark a new one in flight.
    /// With `preempt`, a pending timer and a deferred rerun are dropped since
    /// the caller's cycle uploads the newest state anyway.
    async fn claim_when_idle(&self, preempt: bool) -> InFlightGuard {
        let mut phase = self.subscribe();
        loop {
            {
                let mut state = self.inner.state.lock();
                if preempt {
                    state.cancel_timer();
                }
                if !state.in_flight {
                    if preempt {
                        state.rerun = false;
                    }
                    return self.claim(&mut state);
                }
                self.inner.publish(&state);
            }
            let _ = phase.wait_for(|p| *p != SyncPhase::InFlight).await;
        }
    }

    fn claim(&self, state: &mut SyncState) -> InFlightGuard {
        state.in_flight = true;
        self.inner.publish(state);
        InFlightGuard {
            engine: self.clone(),
        }
    }

    async fn run_cycle(&self) -> Result<SyncOutcome, SyncError> {
        let credential = self
            .inner
            .credentials
            .credential()
            .ok_or(SyncError::NoCredential)?;

        let result = self.exchange(&credential).await;
        if let Err(error) = &result {
            self.note_failure(error);
        }
        result
    }

    async fn pull_cycle(&self) -> Result<bool, SyncError> {
        let credential = self
            .inner
            .credentials
            .credential()
            .ok_or(SyncError::NoCredential)?;
        if self.inner.state.lock().remote_handle.is_some() {
            return Ok(false);
        }

        let result = self
            .resolve(
                self.inner.remote.as_ref(),
                &credential,
                &self.inner.settings.file_name,
            )
            .await
            .map(|(_, pulled)| pulled);
        if let Err(error) = &result {
            self.note_failure(error);
        }
        result
    }

    fn note_failure(&self, error: &SyncError) {
        match error {
            SyncError::Remote(RemoteError::NotFound) => {
                tracing::warn!("remote document vanished; will resolve it again");
                self.inner.state.lock().remote_handle = None;
            }
            SyncError::Remote(RemoteError::Unauthorized) => {
                self.inner.credentials.invalidate();
            }
            _ => {}
        }
    }

    async fn exchange(&self, credential: &str) -> Result<SyncOutcome, SyncError> {
        let remote = self.inner.remote.as_ref();
        let file_name = self.inner.settings.file_name.as_str();

        let cached = self.inner.state.lock().remote_handle.clone();
        let (handle, pulled) = match cached {
            Some(handle) => (Some(handle), false),
            None => self.resolve(remote, credential, file_name).await?,
        };

        let snapshot = self.inner.shared.snapshot();
        let synced_at = Utc::now();
        let document = RemoteDocument::from_task_set(&snapshot, synced_at);
        let written = remote
            .upload(credential, handle.as_ref(), file_name, &document)
            .await?;

        let mut state = self.inner.state.lock();
        state.remote_handle = Some(written.clone());
        state.last_synced_at = Some(synced_at);
        Ok(SyncOutcome {
            pulled,
            handle: written,
            uploaded_active: snapshot.active.len(),
            uploaded_trashed: snapshot.trashed.len(),
            synced_at,
        })
    }

    /// First contact: find the document and, if it has usable contents, let
    /// it replace the local task set. The handle is cached only on success.
    async fn resolve(
        &self,
        remote: &dyn RemoteStore,
        credential: &str,
        file_name: &str,
    ) -> Result<(Option<FileHandle>, bool), SyncError> {
        let Some(handle) = remote.find_by_name(credential, file_name).await? else {
            tracing::debug!(file_name, "no remote document yet");
            return Ok((None, false));
        };

        let pulled = match remote.download(credential, &handle).await {
            Ok(body) => match RemoteDocument::from_value(body) {
                Some(document) => {
                    let set = document.into_task_set();
                    tracing::info!(
                        active = set.active.len(),
                        trashed = set.trashed.len(),
                        "remote document replaces local tasks"
                    );
                    self.inner.shared.replace(set);
                    self.inner.shared.persist().await;
                    true
                }
                None => {
                    tracing::warn!(%handle, "remote document has no usable task list; keeping local tasks");
                    false
                }
            },
            Err(RemoteError::Parse(reason)) => {
                tracing::warn!(%handle, %reason, "remote document unreadable; keeping local tasks");
                false
            }
            Err(error) => return Err(error.into()),
        };

        self.inner.state.lock().remote_handle = Some(handle.clone());
        Ok((Some(handle), pulled))
    }
}

/// Clears the busy flag on every exit path, then arms the deferred rerun.
struct InFlightGuard {
    engine: SyncEngine,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let rerun = {
            let mut state = self.engine.inner.state.lock();
            state.in_flight = false;
            self.engine.inner.publish(&state);
            std::mem::take(&mut state.rerun)
        };
        if rerun {
            tracing::debug!("running deferred sync");
            self.engine.schedule();
        }
    }
}
