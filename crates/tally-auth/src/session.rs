//! The session blob persisted under the `session` key.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::expiry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl Session {
    /// Build a session from a freshly obtained token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmptyToken`] for a blank token.
    pub fn new(
        access_token: impl Into<String>,
        expires_in: Option<Duration>,
        account: Option<String>,
    ) -> Result<Self, AuthError> {
        let access_token = access_token.into().trim().to_string();
        if access_token.is_empty() {
            return Err(AuthError::EmptyToken);
        }
        Ok(Self {
            access_token,
            expires_at: expires_in.map(|ttl| Utc::now() + ttl),
            account,
        })
    }

    #[must_use]
    pub fn expiry(&self) -> Option<DateTime<Utc>> {
        expiry::effective_expiry(&self.access_token, self.expires_at)
    }

    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty()
            && self.expiry().is_none_or(|at| !expiry::is_expired(at, now))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn wire_shape_is_camel_case() {
        let session = Session {
            access_token: "tok".into(),
            expires_at: None,
            account: Some("me@example.com".into()),
        };
        assert_eq!(
            serde_json::to_value(&session).unwrap(),
            json!({"accessToken": "tok", "account": "me@example.com"})
        );
    }

    #[test]
    fn blank_token_rejected() {
        assert!(matches!(Session::new("  ", None, None), Err(AuthError::EmptyToken)));
    }

    #[test]
    fn validity_follows_expiry() {
        let now = Utc::now();
        let fresh = Session::new("tok", Some(Duration::hours(1)), None).unwrap();
        assert!(fresh.is_valid_at(now));
        let stale = Session::new("tok", Some(Duration::seconds(10)), None).unwrap();
        assert!(!stale.is_valid_at(now));
        let opaque = Session::new("tok", None, None).unwrap();
        assert!(opaque.is_valid_at(now));
    }

    #[test]
    fn jwt_exp_used_without_explicit_expiry() {
        let expired = Session::new(crate::expiry::make_jwt_with_exp(1_000), None, None).unwrap();
        assert!(!expired.is_valid_at(Utc::now()));
    }
}
