//! Credential configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Bearer token for the remote backend. When set it takes precedence over
    /// the session saved by `tly auth login`.
    #[serde(default)]
    pub token: String,
}

impl AuthConfig {
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        let token = self.token.trim();
        if token.is_empty() { None } else { Some(token) }
    }
}
