//! Token expiry checks.

use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::error::AuthError;

/// Tokens this close to expiry are already treated as expired.
pub const EXPIRY_BUFFER_SECS: i64 = 60;

/// Decode the `exp` claim of a JWT without verifying its signature.
///
/// # Errors
///
/// Returns [`AuthError::MalformedToken`] if the token is not a three-part
/// JWT or its payload has no numeric `exp`.
pub fn decode_expiry(jwt: &str) -> Result<DateTime<Utc>, AuthError> {
    let mut parts = jwt.split('.');
    let (Some(_), Some(payload), Some(_), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::MalformedToken("expected three dot-separated parts".into()));
    };
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(format!("base64 decode failed: {e}")))?;
    let claims: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::MalformedToken(format!("payload is not JSON: {e}")))?;
    let exp = claims["exp"]
        .as_i64()
        .ok_or_else(|| AuthError::MalformedToken("missing exp claim".into()))?;
    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AuthError::MalformedToken("exp out of range".into()))
}

/// Whether a token expiring at `expires_at` is unusable at `now`.
#[must_use]
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    (expires_at - now).num_seconds() <= EXPIRY_BUFFER_SECS
}

/// Best-known expiry for `token`: the explicit one if given, else the JWT
/// `exp` claim. Opaque tokens have none.
#[must_use]
pub fn effective_expiry(token: &str, explicit: Option<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    explicit.or_else(|| decode_expiry(token).ok())
}

#[cfg(test)]
pub(crate) fn make_jwt_with_exp(exp: i64) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"RS256"}"#);
    let payload = engine.encode(format!(r#"{{"sub":"user_123","exp":{exp}}}"#));
    let signature = engine.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn decodes_exp_claim() {
        let exp = Utc::now().timestamp() + 3600;
        let decoded = decode_expiry(&make_jwt_with_exp(exp)).unwrap();
        assert_eq!(decoded.timestamp(), exp);
    }

    #[test]
    fn rejects_non_jwt() {
        assert!(decode_expiry("ya29.opaque").is_err());
        assert!(decode_expiry("a.b.c.d").is_err());
        assert!(decode_expiry("a.!!!.c").is_err());
    }

    #[test]
    fn missing_exp_is_malformed() {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let jwt = format!("{}.{}.sig", engine.encode("{}"), engine.encode(r#"{"sub":"x"}"#));
        assert!(matches!(decode_expiry(&jwt), Err(AuthError::MalformedToken(_))));
    }

    #[test]
    fn buffer_applies() {
        let now = Utc::now();
        assert!(is_expired(now + Duration::seconds(30), now));
        assert!(is_expired(now - Duration::seconds(1), now));
        assert!(!is_expired(now + Duration::seconds(600), now));
    }

    #[test]
    fn explicit_expiry_wins_over_claim() {
        let explicit = Utc::now() + Duration::days(1);
        let jwt = make_jwt_with_exp(0);
        assert_eq!(effective_expiry(&jwt, Some(explicit)), Some(explicit));
        assert_eq!(effective_expiry(&jwt, None).map(|d| d.timestamp()), Some(0));
        assert_eq!(effective_expiry("opaque", None), None);
    }
}
