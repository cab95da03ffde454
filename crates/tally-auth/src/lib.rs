//! # tally-auth
//!
//! Bearer credentials for the remote backend.
//!
//! The sync engine only ever sees a [`CredentialProvider`]. The production
//! provider, [`SessionCredentials`], resolves a token from configuration
//! first and then from the session saved by `tly auth login`, and treats a
//! token as usable until shortly before it expires.

pub mod error;
pub mod expiry;
pub mod provider;
pub mod session;

pub use error::AuthError;
pub use provider::{CredentialProvider, CredentialSource, CredentialStatus, SessionCredentials, StaticCredential};
pub use session::Session;
