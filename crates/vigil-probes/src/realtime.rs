//! Backend realtime ingestion probes.
//!
//! Checks the `/health` endpoint, opens the `/v4/listen` WebSocket, and
//! streams one second of tone audio to see whether the backend answers. An
//! auth rejection at the WebSocket handshake still proves the endpoint is
//! reachable and is reported as such rather than as a failure.

use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::tungstenite::{self, handshake::client::Request};

use vigil_config::BackendConfig;

use crate::audio;
use crate::error::ProbeError;

/// What the WebSocket handshake established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WsReachability {
    /// The handshake completed and the socket opened.
    Connected,
    /// The endpoint answered the handshake with an auth rejection. It is
    /// reachable; the credentials are the problem.
    AuthRejected(u16),
}

/// Outcome of streaming audio over an open socket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransmissionResult {
    /// Text frames the backend sent back.
    pub responses: Vec<String>,
    /// Whether any response carried transcription segments.
    pub got_segments: bool,
}

/// Client for the backend probes.
pub struct BackendProbe {
    http: reqwest::Client,
    config: BackendConfig,
}

impl BackendProbe {
    /// Create a client with a 5 s HTTP timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .expect("reqwest client should build"),
            config,
        }
    }

    /// GET the health endpoint and return the status code.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Http`] if the request cannot be made at all.
    pub async fn health(&self) -> Result<u16, ProbeError> {
        let resp = self.http.get(self.config.health_url()).send().await?;
        Ok(resp.status().as_u16())
    }

    /// Attempt the WebSocket handshake against the listen endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the endpoint is unreachable or answers
    /// with a non-auth HTTP error. 401 and 403 map to
    /// [`WsReachability::AuthRejected`] instead.
    pub async fn reachability(&self, stt_service: &str) -> Result<WsReachability, ProbeError> {
        match connect_async(self.listen_request(stt_service)?).await {
            Ok((mut socket, _)) => {
                let _ = socket.close(None).await;
                Ok(WsReachability::Connected)
            }
            Err(tungstenite::Error::Http(response)) => {
                let status = response.status().as_u16();
                if status == 401 || status == 403 {
                    Ok(WsReachability::AuthRejected(status))
                } else {
                    Err(ProbeError::Api {
                        status,
                        message: String::from("listen handshake rejected"),
                    })
                }
            }
            Err(error) => Err(ProbeError::WebSocket(error)),
        }
    }

    /// Open the socket, stream one second of tone audio, and collect up to
    /// ten response frames.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the socket cannot be opened or a send
    /// fails. A backend that stays silent is not an error; the result just
    /// carries no responses.
    pub async fn send_audio(&self, stt_service: &str) -> Result<TransmissionResult, ProbeError> {
        let (socket, _) = connect_async(self.listen_request(stt_service)?).await?;
        let (mut write, mut read) = socket.split();

        let pcm = audio::tone(440.0, 1.0, self.config.sample_rate, 0.3);
        for chunk in pcm.chunks(4096) {
            write.send(Message::binary(chunk.to_vec())).await?;
        }
        tracing::debug!(bytes = pcm.len(), "audio streamed to backend");

        let mut result = TransmissionResult::default();
        for _ in 0..10 {
            let message = match tokio::time::timeout(Duration::from_secs(3), read.next()).await {
                Ok(Some(Ok(message))) => message,
                Ok(Some(Err(error))) => {
                    tracing::debug!(%error, "backend socket errored while draining");
                    break;
                }
                Ok(None) | Err(_) => break,
            };
            match message {
                Message::Text(text) => {
                    if let Ok(value) = serde_json::from_str::<serde_json::Value>(text.as_str())
                        && value.get("segments").is_some()
                    {
                        result.got_segments = true;
                    }
                    result.responses.push(text.as_str().to_string());
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
        let _ = write.send(Message::Close(None)).await;
        Ok(result)
    }

    fn listen_request(&self, stt_service: &str) -> Result<Request, ProbeError> {
        let mut request = self
            .config
            .listen_url(stt_service)
            .into_client_request()
            .map_err(ProbeError::WebSocket)?;
        let auth = HeaderValue::from_str(&format!("Bearer {}", self.config.auth_token()))
            .map_err(|e| ProbeError::Parse(format!("auth token is not a valid header value: {e}")))?;
        request.headers_mut().insert("Authorization", auth);
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn listen_request_carries_bearer_auth() {
        let probe = BackendProbe::new(BackendConfig::default());
        let request = probe.listen_request("deepgram").unwrap();
        assert_eq!(
            request.headers().get("Authorization").unwrap(),
            "Bearer dev123test-user-12345"
        );
        assert_eq!(request.uri().path(), "/v4/listen");
    }

    #[tokio::test]
    async fn health_returns_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let probe = BackendProbe::new(BackendConfig {
            url: server.uri().replace("http://", "ws://"),
            ..BackendConfig::default()
        });
        assert_eq!(probe.health().await.unwrap(), 200);
    }

    #[tokio::test]
    async fn handshake_auth_rejection_counts_as_reachable() {
        let server = MockServer::start().await;
        // A plain 401 instead of the upgrade handshake.
        Mock::given(method("GET"))
            .and(path("/v4/listen"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let probe = BackendProbe::new(BackendConfig {
            url: server.uri().replace("http://", "ws://"),
            ..BackendConfig::default()
        });
        let reachability = probe.reachability("deepgram").await.unwrap();
        assert_eq!(reachability, WsReachability::AuthRejected(401));
    }

    #[tokio::test]
    async fn handshake_server_error_is_a_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v4/listen"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let probe = BackendProbe::new(BackendConfig {
            url: server.uri().replace("http://", "ws://"),
            ..BackendConfig::default()
        });
        let err = probe.reachability("deepgram").await.unwrap_err();
        assert!(matches!(err, ProbeError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_websocket_error() {
        let probe = BackendProbe::new(BackendConfig {
            url: String::from("ws://127.0.0.1:1"),
            ..BackendConfig::default()
        });
        let err = probe.reachability("deepgram").await.unwrap_err();
        assert!(matches!(err, ProbeError::WebSocket(_)));
    }
}
