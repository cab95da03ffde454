//! Cross-cutting error types for Tally.
//!
//! Crate-specific errors (`LocalError`, `RemoteError`, `StoreError`, ...) live
//! in their own crates. A unified error is deferred to `tally-cli`, where all
//! crate errors converge into `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any Tally crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (required fields, ranges, formats).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A value could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
