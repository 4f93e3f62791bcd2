//! Deepgram speech-to-text probes.
//!
//! Two exercises: a REST call that validates the API key against the
//! projects endpoint, and a live streaming session that pushes synthetic
//! tone audio over the listen WebSocket and tallies the events that come
//! back. Tone audio is not expected to transcribe to text; the session
//! passes when the socket opens and the server answers with events.

use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::protocol::Message;

use vigil_config::DeepgramConfig;

use crate::audio;
use crate::error::ProbeError;

const REST_BASE: &str = "https://api.deepgram.com";
const WS_BASE: &str = "wss://api.deepgram.com";

/// Outcome of the API-key validation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCheck {
    /// The key is accepted; the account has this many projects.
    Valid { projects: usize },
    /// The key was explicitly rejected (401 or 403).
    Invalid,
    /// The endpoint answered with an unexpected status; the key may still
    /// work for streaming.
    Unverified { status: u16 },
}

/// Options for one live streaming session.
#[derive(Debug, Clone)]
pub struct LiveOptions {
    /// Whether to push tone audio after the socket opens.
    pub send_audio: bool,
    /// How long to keep reading events after the close request.
    pub wait: Duration,
}

impl Default for LiveOptions {
    fn default() -> Self {
        Self {
            send_audio: true,
            wait: Duration::from_secs(5),
        }
    }
}

/// Event counts from one live session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveSessionTally {
    pub opened: bool,
    pub transcripts: usize,
    pub metadata: usize,
    pub speech_started: usize,
    pub utterance_ends: usize,
    pub errors: usize,
    pub closed: bool,
}

impl LiveSessionTally {
    /// The socket opened and the server spoke the protocol back.
    #[must_use]
    pub fn connection_ok(&self) -> bool {
        self.opened && self.errors == 0
    }

    /// Any event arrived at all.
    #[must_use]
    pub fn saw_events(&self) -> bool {
        self.transcripts + self.metadata + self.speech_started + self.utterance_ends > 0
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum LiveEvent {
    Results {
        #[serde(default)]
        channel: Option<Channel>,
        #[serde(default)]
        is_final: bool,
    },
    Metadata {
        #[serde(default)]
        request_id: String,
    },
    SpeechStarted {},
    UtteranceEnd {},
    Error {
        #[serde(default)]
        description: String,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    #[serde(default)]
    transcript: String,
}

#[derive(Deserialize)]
struct ProjectList {
    #[serde(default)]
    projects: Vec<serde_json::Value>,
}

/// Client for the Deepgram probes.
pub struct DeepgramClient {
    http: reqwest::Client,
    config: DeepgramConfig,
    rest_base: String,
    ws_base: String,
}

impl DeepgramClient {
    /// Create a client with a 10 s REST timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: DeepgramConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client should build"),
            config,
            rest_base: String::from(REST_BASE),
            ws_base: String::from(WS_BASE),
        }
    }

    /// Point both planes at different base URLs. Tests use this.
    #[must_use]
    pub fn with_bases(mut self, rest: impl Into<String>, ws: impl Into<String>) -> Self {
        self.rest_base = rest.into();
        self.ws_base = ws.into();
        self
    }

    /// Validate the API key against the projects endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] only on transport failure. Rejection statuses
    /// map to [`KeyCheck`] variants instead.
    pub async fn check_key(&self) -> Result<KeyCheck, ProbeError> {
        let resp = self
            .http
            .get(format!("{}/v1/projects", self.rest_base))
            .header("Authorization", format!("Token {}", self.config.api_key))
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            let list: ProjectList = resp.json().await?;
            return Ok(KeyCheck::Valid {
                projects: list.projects.len(),
            });
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Ok(KeyCheck::Invalid);
        }
        Ok(KeyCheck::Unverified {
            status: status.as_u16(),
        })
    }

    /// Run one live streaming session: open the listen socket, optionally
    /// push tone bursts, request a close, and tally the events that arrive
    /// within the wait window.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the socket cannot be opened.
    pub async fn live_session(&self, options: &LiveOptions) -> Result<LiveSessionTally, ProbeError> {
        let url = self.listen_url();
        let mut request = url
            .into_client_request()
            .map_err(ProbeError::WebSocket)?;
        let auth = HeaderValue::from_str(&format!("Token {}", self.config.api_key))
            .map_err(|e| ProbeError::Parse(format!("API key is not a valid header value: {e}")))?;
        request.headers_mut().insert("Authorization", auth);

        let (socket, _) = connect_async(request).await?;
        let (mut write, mut read) = socket.split();
        let mut tally = LiveSessionTally {
            opened: true,
            ..LiveSessionTally::default()
        };
        tracing::debug!("listen socket opened");

        if options.send_audio {
            // Five tone bursts at stepped frequencies with short gaps, the
            // shape of someone speaking in bursts.
            for i in 0..5u32 {
                let frequency = 440.0 + i as f32 * 100.0;
                let burst = audio::tone(frequency, 0.2, self.config.sample_rate, 0.3);
                write.send(Message::binary(burst)).await?;
                write
                    .send(Message::binary(audio::silence(0.1, self.config.sample_rate)))
                    .await?;
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
        write
            .send(Message::text(r#"{"type":"CloseStream"}"#))
            .await?;

        let deadline = tokio::time::Instant::now() + options.wait;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                break;
            }
            let message = match tokio::time::timeout(remaining, read.next()).await {
                Ok(Some(Ok(message))) => message,
                Ok(Some(Err(error))) => {
                    tracing::debug!(%error, "listen socket errored while draining");
                    break;
                }
                Ok(None) | Err(_) => break,
            };
            match message {
                Message::Text(text) => tally_event(&mut tally, text.as_str()),
                Message::Close(_) => {
                    tally.closed = true;
                    break;
                }
                _ => {}
            }
        }
        Ok(tally)
    }

    fn listen_url(&self) -> String {
        format!(
            "{}/v1/listen?language={}&model={}&sample_rate={}&encoding=linear16&channels=1&punctuate=true&smart_format=true",
            self.ws_base,
            urlencoding::encode(&self.config.language),
            urlencoding::encode(&self.config.model),
            self.config.sample_rate,
        )
    }
}

fn tally_event(tally: &mut LiveSessionTally, raw: &str) {
    let event: LiveEvent = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(error) => {
            tracing::debug!(%error, "unparseable listen event");
            return;
        }
    };
    match event {
        LiveEvent::Results { channel, is_final } => {
            let transcript = channel
                .and_then(|c| c.alternatives.into_iter().next())
                .map(|a| a.transcript)
                .unwrap_or_default();
            if !transcript.is_empty() {
                tracing::info!(%transcript, is_final, "transcript");
            }
            tally.transcripts += 1;
        }
        LiveEvent::Metadata { request_id } => {
            tracing::debug!(%request_id, "metadata event");
            tally.metadata += 1;
        }
        LiveEvent::SpeechStarted {} => tally.speech_started += 1,
        LiveEvent::UtteranceEnd {} => tally.utterance_ends += 1,
        LiveEvent::Error { description } => {
            tracing::warn!(%description, "listen error event");
            tally.errors += 1;
        }
        LiveEvent::Other => {}
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn config() -> DeepgramConfig {
        DeepgramConfig {
            api_key: String::from("dg-test"),
            ..DeepgramConfig::default()
        }
    }

    #[test]
    fn listen_url_carries_session_parameters() {
        let client = DeepgramClient::new(config());
        let url = client.listen_url();
        assert!(url.starts_with("wss://api.deepgram.com/v1/listen?"));
        assert!(url.contains("language=zh"));
        assert!(url.contains("model=nova-2-general"));
        assert!(url.contains("sample_rate=16000"));
        assert!(url.contains("encoding=linear16"));
    }

    #[test]
    fn results_event_with_transcript_is_tallied() {
        let mut tally = LiveSessionTally::default();
        tally_event(
            &mut tally,
            r#"{"type":"Results","is_final":true,"channel":{"alternatives":[{"transcript":"你好"}]}}"#,
        );
        assert_eq!(tally.transcripts, 1);
        assert!(tally.saw_events());
    }

    #[test]
    fn error_event_breaks_connection_ok() {
        let mut tally = LiveSessionTally {
            opened: true,
            ..LiveSessionTally::default()
        };
        tally_event(
            &mut tally,
            r#"{"type":"Error","description":"bad encoding"}"#,
        );
        assert_eq!(tally.errors, 1);
        assert!(!tally.connection_ok());
    }

    #[test]
    fn unknown_event_type_is_ignored() {
        let mut tally = LiveSessionTally::default();
        tally_event(&mut tally, r#"{"type":"SomethingNew","data":1}"#);
        assert_eq!(tally, LiveSessionTally::default());
    }

    #[test]
    fn garbage_event_is_ignored() {
        let mut tally = LiveSessionTally::default();
        tally_event(&mut tally, "not json");
        assert_eq!(tally, LiveSessionTally::default());
    }

    #[tokio::test]
    async fn check_key_accepts_project_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects"))
            .and(header("Authorization", "Token dg-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "projects": [ { "project_id": "p-1", "name": "default" } ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DeepgramClient::new(config()).with_bases(server.uri(), "ws://unused");
        let check = client.check_key().await.unwrap();
        assert_eq!(check, KeyCheck::Valid { projects: 1 });
    }

    #[tokio::test]
    async fn check_key_maps_unauthorized_to_invalid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = DeepgramClient::new(config()).with_bases(server.uri(), "ws://unused");
        assert_eq!(client.check_key().await.unwrap(), KeyCheck::Invalid);
    }

    #[tokio::test]
    async fn check_key_leaves_odd_statuses_unverified() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/projects"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = DeepgramClient::new(config()).with_bases(server.uri(), "ws://unused");
        assert_eq!(
            client.check_key().await.unwrap(),
            KeyCheck::Unverified { status: 503 }
        );
    }

    #[tokio::test]
    #[ignore] // requires network and a Deepgram API key
    async fn live_session_against_deepgram() {
        let api_key = std::env::var("DEEPGRAM_API_KEY").unwrap();
        let client = DeepgramClient::new(DeepgramConfig {
            api_key,
            ..DeepgramConfig::default()
        });
        let tally = client.live_session(&LiveOptions::default()).await.unwrap();
        assert!(tally.connection_ok());
    }
}
