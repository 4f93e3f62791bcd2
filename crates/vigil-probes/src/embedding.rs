//! Multimodal embedding probe with bounded retry-then-degrade.
//!
//! The client never returns an error: each text gets at most three remote
//! attempts with 1 s and 2 s pauses between them, after which the result
//! degrades to an all-zero vector of the configured dimensionality. The
//! degradation is explicit in the return type — an [`Embedding`] carries a
//! `degraded` flag so a zero vector is never mistaken for a real one.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use vigil_config::EmbeddingConfig;

use crate::error::ProbeError;
use crate::http::check_response;

const DEFAULT_ATTEMPTS: usize = 3;

/// Result of embedding one text.
#[derive(Debug, Clone, PartialEq)]
pub struct Embedding {
    /// Vector of exactly the configured dimensionality, in every case.
    pub vector: Vec<f32>,
    /// True when all attempts failed and the vector is the zero sentinel.
    pub degraded: bool,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: EmbeddingData,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// HTTP client for the multimodal embedding endpoint.
pub struct EmbeddingClient {
    http: reqwest::Client,
    config: EmbeddingConfig,
    attempts: usize,
    backoff: Vec<Duration>,
}

impl EmbeddingClient {
    /// Create a client with a 30 s request timeout and the default
    /// 3-attempt, 1 s / 2 s backoff schedule.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: EmbeddingConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
            config,
            attempts: DEFAULT_ATTEMPTS,
            backoff: vec![Duration::from_secs(1), Duration::from_secs(2)],
        }
    }

    /// Override the pauses between attempts. Tests use zero delays.
    #[must_use]
    pub fn with_backoff(mut self, backoff: Vec<Duration>) -> Self {
        self.backoff = backoff;
        self
    }

    /// Embed one text. Never errors: degrades to a zero vector after the
    /// final failed attempt, with a warning in the log.
    pub async fn embed(&self, text: &str) -> Embedding {
        for attempt in 1..=self.attempts {
            match self.request_embedding(text).await {
                Ok(vector) if vector.len() == self.config.dimensions => {
                    return Embedding {
                        vector,
                        degraded: false,
                    };
                }
                Ok(vector) => {
                    tracing::warn!(
                        attempt,
                        got = vector.len(),
                        want = self.config.dimensions,
                        "embedding dimensionality mismatch"
                    );
                }
                Err(error) => {
                    tracing::warn!(attempt, %error, "embedding request failed");
                }
            }
            if attempt < self.attempts
                && let Some(delay) = self.backoff.get(attempt - 1)
            {
                tokio::time::sleep(*delay).await;
            }
        }

        tracing::warn!(
            attempts = self.attempts,
            dimensions = self.config.dimensions,
            "embedding degraded to zero vector"
        );
        Embedding {
            vector: vec![0.0; self.config.dimensions],
            degraded: true,
        }
    }

    async fn request_embedding(&self, text: &str) -> Result<Vec<f32>, ProbeError> {
        let body = json!({
            "model": self.config.model,
            "input": [ { "type": "text", "text": text } ],
            "dimensions": self.config.dimensions,
            "encoding_format": "float",
        });
        let resp = self
            .http
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let data: EmbeddingResponse = resp.json().await?;
        Ok(data.data.embedding)
    }
}
