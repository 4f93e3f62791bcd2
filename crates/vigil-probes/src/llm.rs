//! Chat-completion probes against an OpenAI-compatible endpoint.
//!
//! Two exercises: a plain completion that just has to come back with text,
//! and a schema-constrained structured-output request that falls through to a
//! plain-JSON fallback prompt when the constrained parse fails. The probe
//! reports FAIL only when both paths fail.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use vigil_config::LlmConfig;

use crate::error::ProbeError;
use crate::http::check_response;

/// Prompt for the basic completion exercise.
pub const SMOKE_PROMPT: &str =
    "Say 'Hello World' in Chinese. Reply with only the Chinese text.";

const STRUCTURED_PROMPT: &str = "Analyze this text and provide structured output:\n\
Text: \"Today I had a meeting with John about the project. We need to submit by Friday.\"";

const FALLBACK_PROMPT: &str = r#"Return a JSON object with: {"title": "Meeting notes", "overview": "test", "emoji": "📝", "category": "work"}"#;

/// Structured summary the constrained request must produce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredSummary {
    pub title: String,
    pub overview: String,
    pub emoji: String,
    pub category: String,
}

/// How the structured-output exercise succeeded.
#[derive(Debug)]
pub enum StructuredOutcome {
    /// The schema-constrained parse produced a [`StructuredSummary`].
    Schema(StructuredSummary),
    /// The constrained parse failed but the raw-JSON fallback parsed.
    Fallback(serde_json::Value),
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// HTTP client for the chat-completion endpoint.
pub struct LlmClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a client with a 30 s request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: LlmConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
            config,
        }
    }

    /// Issue one completion request and return the text content.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the request fails, the endpoint returns a
    /// non-success status, or the response carries no text content.
    pub async fn complete(&self, prompt: &str) -> Result<String, ProbeError> {
        let content = self.chat(prompt, None).await?;
        if content.trim().is_empty() {
            return Err(ProbeError::Parse(String::from(
                "completion response had empty content",
            )));
        }
        Ok(content)
    }

    /// Structured-output exercise with raw-JSON fallback.
    ///
    /// First issues a schema-constrained request. If that fails for any
    /// reason (API error or unparseable content), falls through to a plain
    /// prompt asking for a JSON object and parses it leniently.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] only when both paths fail.
    pub async fn structured(&self) -> Result<StructuredOutcome, ProbeError> {
        match self.schema_constrained().await {
            Ok(summary) => Ok(StructuredOutcome::Schema(summary)),
            Err(error) => {
                tracing::warn!(%error, "schema-constrained parse failed, trying plain-JSON fallback");
                let raw = self.chat(FALLBACK_PROMPT, None).await?;
                let cleaned = strip_code_fences(&raw);
                let value: serde_json::Value = serde_json::from_str(&cleaned)
                    .map_err(|e| ProbeError::Parse(format!("fallback JSON did not parse: {e}")))?;
                Ok(StructuredOutcome::Fallback(value))
            }
        }
    }

    async fn schema_constrained(&self) -> Result<StructuredSummary, ProbeError> {
        let content = self
            .chat(STRUCTURED_PROMPT, Some(summary_response_format()))
            .await?;
        serde_json::from_str(strip_code_fences(&content).as_str())
            .map_err(|e| ProbeError::Parse(format!("structured content did not match schema: {e}")))
    }

    async fn chat(
        &self,
        prompt: &str,
        response_format: Option<serde_json::Value>,
    ) -> Result<String, ProbeError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: 200,
            response_format,
        };
        let resp = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let data: ChatResponse = resp.json().await?;
        data.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProbeError::Parse(String::from("response carried no choices")))
    }
}

/// JSON-schema response format for the structured summary.
fn summary_response_format() -> serde_json::Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "structured_summary",
            "strict": true,
            "schema": {
                "type": "object",
                "properties": {
                    "title": { "type": "string" },
                    "overview": { "type": "string" },
                    "emoji": { "type": "string" },
                    "category": { "type": "string" }
                },
                "required": ["title", "overview", "emoji", "category"],
                "additionalProperties": false
            }
        }
    })
}

/// Strip markdown code fences some models wrap JSON answers in.
fn strip_code_fences(content: &str) -> String {
    content
        .trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}
