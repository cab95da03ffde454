//! # tally-store
//!
//! The task store and its sync engine.
//!
//! [`TaskStore`] owns the task set. Every mutation updates memory first,
//! then writes the whole set to local persistence, then asks the
//! [`SyncEngine`] (when there is one) to schedule a remote sync. The engine
//! debounces those requests and never runs two remote exchanges at once.
//!
//! Trashed tasks are kept beside the active ones so ids are never reused, but
//! every read that is not explicitly about the trash sees active tasks only.

pub mod error;
pub mod repository;
mod shared;
pub mod store;
pub mod sync;

pub use error::{StoreError, SyncError};
pub use repository::TaskRepository;
pub use store::TaskStore;
pub use sync::{SyncEngine, SyncOutcome, SyncPhase, SyncSettings};
