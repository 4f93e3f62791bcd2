//! Backend realtime ingestion endpoint configuration.
//!
//! Covers the `/v4/listen` WebSocket endpoint and the `/health` HTTP check.
//! Authentication uses a bearer token formed by concatenating the admin key
//! and the user identifier, matching the backend's dev-mode auth path.

use serde::{Deserialize, Serialize};

fn default_url() -> String {
    String::from("ws://localhost:8000")
}

fn default_uid() -> String {
    String::from("test-user-12345")
}

fn default_admin_key() -> String {
    String::from("dev123")
}

fn default_language() -> String {
    String::from("zh")
}

const fn default_sample_rate() -> u32 {
    16000
}

fn default_codec() -> String {
    String::from("pcm16")
}

const fn default_conversation_timeout() -> u32 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Backend base URL (`ws://` or `wss://`).
    #[serde(default = "default_url")]
    pub url: String,

    /// User identifier the probe connects as.
    #[serde(default = "default_uid")]
    pub uid: String,

    /// Admin key; the bearer token is `{admin_key}{uid}`.
    #[serde(default = "default_admin_key")]
    pub admin_key: String,

    /// Transcription language query parameter.
    #[serde(default = "default_language")]
    pub language: String,

    /// Audio sample rate (Hz).
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Audio codec query parameter.
    #[serde(default = "default_codec")]
    pub codec: String,

    /// Conversation timeout (seconds) query parameter.
    #[serde(default = "default_conversation_timeout")]
    pub conversation_timeout: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            uid: default_uid(),
            admin_key: default_admin_key(),
            language: default_language(),
            sample_rate: default_sample_rate(),
            codec: default_codec(),
            conversation_timeout: default_conversation_timeout(),
        }
    }
}

impl BackendConfig {
    /// WebSocket URL of the realtime ingestion endpoint for the given STT
    /// backend selection.
    #[must_use]
    pub fn listen_url(&self, stt_service: &str) -> String {
        format!(
            "{}/v4/listen?language={}&sample_rate={}&codec={}&uid={}&include_speech_profile=false&stt_service={}&conversation_timeout={}",
            self.url.trim_end_matches('/'),
            urlencoding::encode(&self.language),
            self.sample_rate,
            urlencoding::encode(&self.codec),
            urlencoding::encode(&self.uid),
            urlencoding::encode(stt_service),
            self.conversation_timeout,
        )
    }

    /// Bearer token: admin key concatenated with the uid.
    #[must_use]
    pub fn auth_token(&self) -> String {
        format!("{}{}", self.admin_key, self.uid)
    }

    /// HTTP health-check URL derived from the WebSocket base URL.
    #[must_use]
    pub fn health_url(&self) -> String {
        let base = self.url.trim_end_matches('/');
        let http_base = if let Some(rest) = base.strip_prefix("wss://") {
            format!("https://{rest}")
        } else if let Some(rest) = base.strip_prefix("ws://") {
            format!("http://{rest}")
        } else {
            base.to_string()
        };
        format!("{http_base}/health")
    }
}
