//! Remote backend error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the credential (401 or 403).
    #[error("credential rejected by remote backend")]
    Unauthorized,

    /// The document no longer exists (404).
    #[error("remote document not found")]
    NotFound,

    /// The backend returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying (from `Retry-After`, default 60).
        retry_after_secs: u64,
    },

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response body could not be interpreted.
    #[error("parse error: {0}")]
    Parse(String),
}
