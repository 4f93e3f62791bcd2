//! Deepgram speech-to-text configuration.

use serde::{Deserialize, Serialize};

fn default_language() -> String {
    String::from("zh")
}

fn default_model() -> String {
    String::from("nova-2-general")
}

const fn default_sample_rate() -> u32 {
    16000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeepgramConfig {
    /// Deepgram API key.
    #[serde(default)]
    pub api_key: String,

    /// Transcription language.
    #[serde(default = "default_language")]
    pub language: String,

    /// Streaming model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// Audio sample rate (Hz) for the live session.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

impl Default for DeepgramConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            language: default_language(),
            model: default_model(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl DeepgramConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::DeepgramConfig;

    #[test]
    fn defaults_match_streaming_handler() {
        let config = DeepgramConfig::default();
        assert_eq!(config.language, "zh");
        assert_eq!(config.model, "nova-2-general");
        assert_eq!(config.sample_rate, 16000);
        assert!(!config.is_configured());
    }
}
