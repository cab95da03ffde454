//! In-process backend.
//!
//! Used when no real backend is wanted and as the test double for the sync
//! engine: it records every call in order, can fail the next call of a given
//! kind, can hold uploads until released, and tracks how many calls overlap.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tally_core::document::RemoteDocument;
use tokio::sync::watch;

use crate::{FileHandle, RemoteError, RemoteStore};

/// A recorded call, in the order calls started.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    FindByName {
        name: String,
    },
    Download {
        handle: FileHandle,
    },
    Upload {
        handle: Option<FileHandle>,
        name: String,
        document: RemoteDocument,
    },
}

impl RemoteCall {
    #[must_use]
    pub const fn kind(&self) -> CallKind {
        match self {
            Self::FindByName { .. } => CallKind::FindByName,
            Self::Download { .. } => CallKind::Download,
            Self::Upload { .. } => CallKind::Upload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    FindByName,
    Download,
    Upload,
}

/// A failure to inject into the next call of some kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Unauthorized,
    NotFound,
    RateLimited(u64),
    Api(u16, String),
}

impl From<Failure> for RemoteError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Unauthorized => Self::Unauthorized,
            Failure::NotFound => Self::NotFound,
            Failure::RateLimited(retry_after_secs) => Self::RateLimited { retry_after_secs },
            Failure::Api(status, message) => Self::Api { status, message },
        }
    }
}

#[derive(Debug, Default)]
struct Files {
    by_id: HashMap<String, (String, serde_json::Value)>,
    next_id: u64,
}

impl Files {
    fn allocate(&mut self) -> String {
        self.next_id += 1;
        format!("mem-{}", self.next_id)
    }
}

pub struct MemoryRemote {
    files: Mutex<Files>,
    calls: Mutex<Vec<RemoteCall>>,
    failures: Mutex<VecDeque<(CallKind, Failure)>>,
    started: watch::Sender<usize>,
    upload_gate: watch::Sender<bool>,
    active: AtomicUsize,
    max_active: AtomicUsize,
}

impl Default for MemoryRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRemote {
    #[must_use]
    pub fn new() -> Self {
        Self {
            files: Mutex::new(Files::default()),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(VecDeque::new()),
            started: watch::Sender::new(0),
            upload_gate: watch::Sender::new(true),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
        }
    }

    /// Store a raw document as if another device had uploaded it.
    pub fn seed(&self, name: &str, body: serde_json::Value) -> FileHandle {
        let mut files = self.files.lock();
        let id = files.allocate();
        files.by_id.insert(id.clone(), (name.to_string(), body));
        FileHandle::new(id)
    }

    /// Drop a stored document, so the next access by handle is a 404.
    pub fn remove(&self, handle: &FileHandle) {
        self.files.lock().by_id.remove(handle.as_str());
    }

    /// Current body of the document called `name`.
    #[must_use]
    pub fn document(&self, name: &str) -> Option<serde_json::Value> {
        self.files
            .lock()
            .by_id
            .values()
            .find(|(stored, _)| stored == name)
            .map(|(_, body)| body.clone())
    }

    #[must_use]
    pub fn calls(&self) -> Vec<RemoteCall> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn uploads(&self) -> Vec<RemoteCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.kind() == CallKind::Upload)
            .cloned()
            .collect()
    }

    /// Highest number of calls that were ever running at once.
    #[must_use]
    pub fn max_concurrent_calls(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Fail the next call of `kind` with `failure`. Queued failures are
    /// consumed in order.
    pub fn fail_next(&self, kind: CallKind, failure: Failure) {
        self.failures.lock().push_back((kind, failure));
    }

    /// Make uploads wait until [`Self::release_uploads`].
    pub fn hold_uploads(&self) {
        self.upload_gate.send_replace(false);
    }

    pub fn release_uploads(&self) {
        self.upload_gate.send_replace(true);
    }

    /// Wait until at least `count` calls have started.
    pub async fn wait_for_calls(&self, count: usize) {
        let mut rx = self.started.subscribe();
        let _ = rx.wait_for(|started| *started >= count).await;
    }

    fn begin(&self, call: RemoteCall) -> Result<ActiveCall<'_>, RemoteError> {
        let kind = call.kind();
        self.calls.lock().push(call);
        self.started.send_modify(|started| *started += 1);

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);
        let guard = ActiveCall(&self.active);

        let mut failures = self.failures.lock();
        if let Some(index) = failures.iter().position(|(k, _)| *k == kind)
            && let Some((_, failure)) = failures.remove(index)
        {
            return Err(failure.into());
        }
        Ok(guard)
    }
}

struct ActiveCall<'a>(&'a AtomicUsize);

impl Drop for ActiveCall<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl RemoteStore for MemoryRemote {
    async fn find_by_name(
        &self,
        _credential: &str,
        name: &str,
    ) -> Result<Option<FileHandle>, RemoteError> {
        let _active = self.begin(RemoteCall::FindByName { name: name.into() })?;
        tokio::task::yield_now().await;
        let files = self.files.lock();
        let mut ids: Vec<&String> = files
            .by_id
            .iter()
            .filter(|(_, (stored, _))| stored == name)
            .map(|(id, _)| id)
            .collect();
        ids.sort();
        Ok(ids.first().map(|id| FileHandle::new(id.as_str())))
    }

    async fn download(
        &self,
        _credential: &str,
        handle: &FileHandle,
    ) -> Result<serde_json::Value, RemoteError> {
        let _active = self.begin(RemoteCall::Download {
            handle: handle.clone(),
        })?;
        tokio::task::yield_now().await;
        self.files
            .lock()
            .by_id
            .get(handle.as_str())
            .map(|(_, body)| body.clone())
            .ok_or(RemoteError::NotFound)
    }

    async fn upload(
        &self,
        _credential: &str,
        handle: Option<&FileHandle>,
        name: &str,
        document: &RemoteDocument,
    ) -> Result<FileHandle, RemoteError> {
        let _active = self.begin(RemoteCall::Upload {
            handle: handle.cloned(),
            name: name.into(),
            document: document.clone(),
        })?;

        let mut gate = self.upload_gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;

        let body = serde_json::to_value(document)
            .map_err(|e| RemoteError::Parse(format!("cannot encode document: {e}")))?;
        let mut files = self.files.lock();
        let id = match handle {
            Some(handle) => {
                let entry = files
                    .by_id
                    .get_mut(handle.as_str())
                    .ok_or(RemoteError::NotFound)?;
                entry.1 = body;
                handle.as_str().to_string()
            }
            None => {
                let id = files.allocate();
                files.by_id.insert(id.clone(), (name.to_string(), body));
                id
            }
        };
        Ok(FileHandle::new(id))
    }
}
