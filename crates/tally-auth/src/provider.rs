//! Credential resolution for the sync engine.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tally_local::{KeyValueStore, StorageKey};

use crate::error::AuthError;
use crate::expiry;
use crate::session::Session;

/// What the sync engine needs to know about credentials.
///
/// All methods are synchronous and cheap; they are called on every mutation.
pub trait CredentialProvider: Send + Sync {
    /// Whether [`Self::credential`] would currently return a token.
    fn has_valid_credential(&self) -> bool {
        self.credential().is_some()
    }

    /// The bearer token to use for the next remote call.
    fn credential(&self) -> Option<String>;

    /// Mark the current credential as rejected by the backend.
    fn invalidate(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// `[auth] token` or `TALLY_AUTH__TOKEN`.
    Config,
    /// Saved by `tly auth login`.
    Session,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialStatus {
    pub source: CredentialSource,
    pub valid: bool,
    pub invalidated: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub account: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    session: Option<Session>,
    /// Set when the backend rejected the token; cleared by a new login.
    invalidated: bool,
}

/// Resolves the configured token first, then the persisted session.
pub struct SessionCredentials {
    config_token: Option<String>,
    persistence: Arc<dyn KeyValueStore>,
    state: RwLock<State>,
}

impl SessionCredentials {
    /// Read the persisted session. A malformed or unreadable blob is logged
    /// and treated as signed out.
    pub async fn load(persistence: Arc<dyn KeyValueStore>, config_token: Option<String>) -> Self {
        let session = match persistence.get(StorageKey::Session).await {
            Ok(Some(value)) => match serde_json::from_value::<Session>(value) {
                Ok(session) => Some(session),
                Err(error) => {
                    tracing::warn!(%error, "ignoring malformed session");
                    None
                }
            },
            Ok(None) => None,
            Err(error) => {
                tracing::warn!(%error, "failed to read session");
                None
            }
        };
        let config_token = config_token
            .map(|token| token.trim().to_string())
            .filter(|token| !token.is_empty());

        Self {
            config_token,
            persistence,
            state: RwLock::new(State {
                session,
                invalidated: false,
            }),
        }
    }

    /// Persist a new session and clear any previous invalidation.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] if the session cannot be serialized or written.
    pub async fn login(&self, session: Session) -> Result<(), AuthError> {
        let value = serde_json::to_value(&session)?;
        self.persistence.set(StorageKey::Session, &value).await?;
        let mut state = self.state.write();
        state.session = Some(session);
        state.invalidated = false;
        tracing::info!("session saved");
        Ok(())
    }

    /// Forget the persisted session. A configured token is unaffected.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Storage`] if the session cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.persistence.delete(StorageKey::Session).await?;
        self.state.write().session = None;
        Ok(())
    }

    #[must_use]
    pub fn status(&self) -> CredentialStatus {
        let state = self.state.read();
        let now = Utc::now();
        if let Some(token) = &self.config_token {
            let expires_at = expiry::effective_expiry(token, None);
            return CredentialStatus {
                source: CredentialSource::Config,
                valid: !state.invalidated && expires_at.is_none_or(|at| !expiry::is_expired(at, now)),
                invalidated: state.invalidated,
                expires_at,
                account: None,
            };
        }
        match &state.session {
            Some(session) => CredentialStatus {
                source: CredentialSource::Session,
                valid: !state.invalidated && session.is_valid_at(now),
                invalidated: state.invalidated,
                expires_at: session.expiry(),
                account: session.account.clone(),
            },
            None => CredentialStatus {
                source: CredentialSource::None,
                valid: false,
                invalidated: state.invalidated,
                expires_at: None,
                account: None,
            },
        }
    }
}

impl CredentialProvider for SessionCredentials {
    fn credential(&self) -> Option<String> {
        let state = self.state.read();
        if state.invalidated {
            return None;
        }
        let now = Utc::now();
        if let Some(token) = &self.config_token {
            let usable = expiry::effective_expiry(token, None)
                .is_none_or(|at| !expiry::is_expired(at, now));
            return usable.then(|| token.clone());
        }
        state
            .session
            .as_ref()
            .filter(|session| session.is_valid_at(now))
            .map(|session| session.access_token.clone())
    }

    fn invalidate(&self) {
        let mut state = self.state.write();
        if !state.invalidated {
            tracing::warn!("remote rejected the credential; sync paused until next login");
        }
        state.invalidated = true;
    }
}

/// A fixed token, for tests and one-off runs.
#[derive(Debug, Default)]
pub struct StaticCredential {
    token: Mutex<Option<String>>,
    invalidations: Mutex<usize>,
}

impl StaticCredential {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
            invalidations: Mutex::new(0),
        }
    }

    /// A provider that never has a credential.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    pub fn set(&self, token: Option<String>) {
        *self.token.lock() = token;
    }

    #[must_use]
    pub fn invalidation_count(&self) -> usize {
        *self.invalidations.lock()
    }
}

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn invalidate(&self) {
        *self.token.lock() = None;
        *self.invalidations.lock() += 1;
    }
}
