//! # tally-remote
//!
//! The remote side of sync: a single JSON document per account, found by
//! name, downloaded whole, and replaced whole on every upload.
//!
//! [`DriveClient`] talks to the Google Drive application-data folder.
//! [`MemoryRemote`] keeps documents in process and records every call.

pub mod drive;
pub mod error;
mod http;
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tally_core::document::RemoteDocument;

pub use drive::{DriveClient, DriveSettings};
pub use error::RemoteError;
pub use memory::{CallKind, Failure, MemoryRemote, RemoteCall};

/// Backend-assigned identifier of the remote document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileHandle(String);

impl FileHandle {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A store of named JSON documents behind a bearer credential.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Look up the document called `name`.
    async fn find_by_name(
        &self,
        credential: &str,
        name: &str,
    ) -> Result<Option<FileHandle>, RemoteError>;

    /// Fetch the raw document body.
    async fn download(
        &self,
        credential: &str,
        handle: &FileHandle,
    ) -> Result<serde_json::Value, RemoteError>;

    /// Replace the document at `handle`, or create one called `name` when
    /// `handle` is `None`. Returns the handle of the written document.
    async fn upload(
        &self,
        credential: &str,
        handle: Option<&FileHandle>,
        name: &str,
        document: &RemoteDocument,
    ) -> Result<FileHandle, RemoteError>;
}
