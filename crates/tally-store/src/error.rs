use tally_core::errors::CoreError;
use tally_remote::RemoteError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("no valid credential. Run `tly auth login --token <TOKEN>`")]
    NoCredential,

    #[error(transparent)]
    Remote(#[from] RemoteError),
}
