//! Status-code mapping shared by HTTP backends.

use crate::error::RemoteError;

/// Return the response unchanged on success, otherwise map the status:
/// 401/403 to [`RemoteError::Unauthorized`], 404 to [`RemoteError::NotFound`],
/// 429 to [`RemoteError::RateLimited`] (honouring `Retry-After`, default
/// 60 s), anything else to [`RemoteError::Api`] with the body as message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, RemoteError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    match status.as_u16() {
        401 | 403 => Err(RemoteError::Unauthorized),
        404 => Err(RemoteError::NotFound),
        429 => Err(RemoteError::RateLimited {
            retry_after_secs: parse_retry_after(&resp),
        }),
        code => Err(RemoteError::Api {
            status: code,
            message: resp.text().await.unwrap_or_default(),
        }),
    }
}

fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(status)
                .body(body)
                .unwrap(),
        )
    }

    fn mock_response_with_retry_after(value: &str) -> reqwest::Response {
        reqwest::Response::from(
            ::http::Response::builder()
                .status(429)
                .header("Retry-After", value)
                .body("")
                .unwrap(),
        )
    }

    #[test]
    fn retry_after_header_is_parsed() {
        assert_eq!(parse_retry_after(&mock_response_with_retry_after("120")), 120);
        assert_eq!(parse_retry_after(&mock_response_with_retry_after("soon")), 60);
        assert_eq!(parse_retry_after(&mock_response(429, "")), 60);
    }

    #[tokio::test]
    async fn auth_failures_map_to_unauthorized() {
        for status in [401, 403] {
            let err = check_response(mock_response(status, "")).await.unwrap_err();
            assert!(matches!(err, RemoteError::Unauthorized), "status {status}");
        }
    }

    #[tokio::test]
    async fn missing_document_maps_to_not_found() {
        let err = check_response(mock_response(404, "")).await.unwrap_err();
        assert!(matches!(err, RemoteError::NotFound));
    }

    #[tokio::test]
    async fn rate_limit_uses_header() {
        let err = check_response(mock_response_with_retry_after("30")).await.unwrap_err();
        assert!(matches!(err, RemoteError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn other_errors_carry_body() {
        let err = check_response(mock_response(500, "backend exploded")).await.unwrap_err();
        match err {
            RemoteError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "backend exploded");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn success_passes_through() {
        assert!(check_response(mock_response(200, "{}")).await.is_ok());
    }
}
