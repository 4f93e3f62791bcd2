//! Multimodal embedding endpoint configuration (Doubao-style).

use serde::{Deserialize, Serialize};

fn default_url() -> String {
    String::from("https://ark.cn-beijing.volces.com/api/v3/embeddings/multimodal")
}

fn default_model() -> String {
    String::from("doubao-embedding-vision-251215")
}

const fn default_dimensions() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingConfig {
    /// API key (bearer token).
    #[serde(default)]
    pub api_key: String,

    /// Full URL of the multimodal embedding endpoint.
    #[serde(default = "default_url")]
    pub url: String,

    /// Embedding model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Vector dimensionality requested from (and expected of) the endpoint.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            url: default_url(),
            model: default_model(),
            dimensions: default_dimensions(),
        }
    }
}

impl EmbeddingConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::EmbeddingConfig;

    #[test]
    fn defaults_match_backend_deployment() {
        let config = EmbeddingConfig::default();
        assert_eq!(config.dimensions, 1024);
        assert_eq!(config.model, "doubao-embedding-vision-251215");
        assert!(config.url.contains("/embeddings/multimodal"));
        assert!(!config.is_configured());
    }
}
