use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not authenticated. Run `tly auth login --token <TOKEN>`")]
    NotAuthenticated,

    #[error("token must not be empty")]
    EmptyToken,

    #[error("malformed token: {0}")]
    MalformedToken(String),

    #[error("session storage error: {0}")]
    Storage(#[from] tally_local::LocalError),

    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
