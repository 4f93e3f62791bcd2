//! Shared HTTP response helper for probe clients.

use crate::error::ProbeError;

/// Check an HTTP response for a non-success status.
///
/// Returns the response unchanged on success; otherwise consumes the body into
/// [`ProbeError::Api`] so the probe can report the status and message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ProbeError> {
    if !resp.status().is_success() {
        return Err(ProbeError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
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

    #[tokio::test]
    async fn success_passes_through() {
        let resp = mock_response(200, "ok");
        assert!(check_response(resp).await.is_ok());
    }

    #[tokio::test]
    async fn non_success_carries_status_and_body() {
        let resp = mock_response(503, "upstream unavailable");
        let err = check_response(resp).await.unwrap_err();
        match err {
            ProbeError::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "upstream unavailable");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
