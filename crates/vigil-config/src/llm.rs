//! Chat-completion endpoint configuration (OpenAI-compatible).

use serde::{Deserialize, Serialize};

fn default_api_base() -> String {
    String::from("https://api.openai.com/v1")
}

fn default_model() -> String {
    String::from("gpt-4")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// API key (bearer token).
    #[serde(default)]
    pub api_key: String,

    /// Base URL of the OpenAI-compatible API.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model name sent in completion requests.
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
        }
    }
}

impl LlmConfig {
    /// An API key is the only hard prerequisite; base URL and model have
    /// defaults.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }

    /// Full URL of the chat-completions endpoint.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::LlmConfig;

    #[test]
    fn defaults_point_at_openai() {
        let config = LlmConfig::default();
        assert_eq!(config.api_base, "https://api.openai.com/v1");
        assert_eq!(config.model, "gpt-4");
        assert!(!config.is_configured());
    }

    #[test]
    fn completions_url_handles_trailing_slash() {
        let config = LlmConfig {
            api_base: String::from("https://llm.internal/v1/"),
            ..LlmConfig::default()
        };
        assert_eq!(
            config.completions_url(),
            "https://llm.internal/v1/chat/completions"
        );
    }
}
