//! Pinecone vector database configuration.

use serde::{Deserialize, Serialize};

fn default_index_name() -> String {
    String::from("omi-memories")
}

const fn default_dimensions() -> usize {
    1024
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VectorConfig {
    /// Pinecone API key.
    #[serde(default)]
    pub api_key: String,

    /// Index expected to exist in the project.
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// Data-plane host of the index (e.g. `myindex-abc123.svc.pinecone.io`).
    /// When set, the probe also runs a metadata-filtered query.
    #[serde(default)]
    pub index_host: String,

    /// Dimensionality of the index vectors.
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            index_name: default_index_name(),
            index_host: String::new(),
            dimensions: default_dimensions(),
        }
    }
}

impl VectorConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::VectorConfig;

    #[test]
    fn defaults_target_memories_index() {
        let config = VectorConfig::default();
        assert_eq!(config.index_name, "omi-memories");
        assert_eq!(config.dimensions, 1024);
        assert!(!config.is_configured());
    }
}
