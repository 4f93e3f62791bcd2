//! # vigil-config
//!
//! Layered configuration loading for Vigil using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`VIGIL_*` prefix, `__` as separator)
//! 2. Project-level `.vigil/config.toml`
//! 3. User-level `~/.config/vigil/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `VIGIL_EMBEDDING__API_KEY` -> `embedding.api_key`,
//! `VIGIL_BACKEND__URL` -> `backend.url`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! On top of the figment layers, the conventional environment variables the
//! backend deployment already uses (`OPENAI_API_KEY`, `DEEPGRAM_API_KEY`,
//! `REDIS_HOST`, ...) are honored as a fallback for fields the layered config
//! left empty, so the probes work unchanged inside the backend's container.
//!
//! Every service section exposes `is_configured()`; a probe whose section is
//! not configured reports SKIP rather than attempting the call.

mod backend;
mod cache;
mod deepgram;
mod docstore;
mod embedding;
mod error;
mod llm;
mod storage;
mod vector;

pub use backend::BackendConfig;
pub use cache::CacheConfig;
pub use deepgram::DeepgramConfig;
pub use docstore::DocstoreConfig;
pub use embedding::EmbeddingConfig;
pub use error::ConfigError;
pub use llm::LlmConfig;
pub use storage::StorageConfig;
pub use vector::VectorConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VigilConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub deepgram: DeepgramConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub docstore: DocstoreConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub vector: VectorConfig,
    #[serde(default)]
    pub backend: BackendConfig,
}

impl VigilConfig {
    /// Load configuration from all sources (TOML files + environment
    /// variables), then apply the conventional env-var aliases.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if figment extraction fails.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config: Self = Self::figment().extract()?;
        config.apply_env_aliases();
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the CLI.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if figment extraction fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add additional
    /// providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".vigil/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("VIGIL_").split("__"))
    }

    /// Fill fields the layered config left empty from the conventional
    /// environment variables the backend deployment already sets.
    pub fn apply_env_aliases(&mut self) {
        fill(&mut self.llm.api_key, "OPENAI_API_KEY");
        fill(&mut self.llm.api_base, "OPENAI_API_BASE");
        fill(&mut self.llm.model, "OPENAI_MODEL");

        fill(&mut self.embedding.api_key, "DOUBAO_API_KEY");
        fill(&mut self.embedding.url, "DOUBAO_EMBEDDING_URL");
        fill(&mut self.embedding.model, "DOUBAO_EMBEDDING_MODEL");

        fill(&mut self.deepgram.api_key, "DEEPGRAM_API_KEY");

        fill(&mut self.cache.host, "REDIS_HOST");
        fill(&mut self.cache.host, "REDIS_DB_HOST");
        fill_parsed(&mut self.cache.port, "REDIS_PORT");
        fill_parsed(&mut self.cache.port, "REDIS_DB_PORT");

        fill(&mut self.docstore.project_id, "GOOGLE_CLOUD_PROJECT");
        fill(&mut self.docstore.project_id, "GCLOUD_PROJECT");
        fill(&mut self.docstore.emulator_host, "FIRESTORE_EMULATOR_HOST");

        fill(&mut self.storage.bucket, "BUCKET_PRIVATE_CLOUD_SYNC");

        fill(&mut self.vector.api_key, "PINECONE_API_KEY");
        fill(&mut self.vector.index_name, "PINECONE_INDEX_NAME");
        fill(&mut self.vector.index_host, "PINECONE_INDEX_HOST");

        fill(&mut self.backend.url, "BACKEND_URL");
        fill(&mut self.backend.uid, "TEST_UID");
        fill(&mut self.backend.language, "TEST_LANGUAGE");
        fill(&mut self.backend.admin_key, "ADMIN_KEY");
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vigil").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> workspace root)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

/// Alias fallback: only fields the layered config left empty are filled, so
/// `VIGIL_*` and TOML values always win over the conventional variables.
fn fill(field: &mut String, var: &str) {
    if field.is_empty()
        && let Ok(value) = std::env::var(var)
        && !value.is_empty()
    {
        *field = value;
    }
}

fn fill_parsed<T: std::str::FromStr>(field: &mut Option<T>, var: &str) {
    if field.is_none()
        && let Ok(value) = std::env::var(var)
        && let Ok(parsed) = value.parse()
    {
        *field = Some(parsed);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_loads() {
        let config = VigilConfig::default();
        assert!(!config.llm.is_configured());
        assert!(!config.embedding.is_configured());
        assert!(!config.deepgram.is_configured());
        assert!(!config.docstore.is_configured());
        assert!(!config.storage.is_configured());
        assert!(!config.vector.is_configured());
    }

    #[test]
    fn figment_builds_without_files() {
        figment::Jail::expect_with(|_jail| {
            let config: VigilConfig = VigilConfig::figment().extract().expect("defaults");
            assert_eq!(config.embedding.dimensions, 1024);
            assert_eq!(config.backend.url, "ws://localhost:8000");
            Ok(())
        });
    }

    #[test]
    fn env_prefix_maps_to_sections() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("VIGIL_DEEPGRAM__API_KEY", "dg-secret");
            jail.set_env("VIGIL_CACHE__HOST", "cache.internal");
            let config: VigilConfig = VigilConfig::figment().extract().expect("config");
            assert_eq!(config.deepgram.api_key, "dg-secret");
            assert_eq!(config.cache.host, "cache.internal");
            assert!(config.deepgram.is_configured());
            Ok(())
        });
    }

    #[test]
    fn project_toml_layer_is_read() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".vigil")?;
            jail.create_file(
                ".vigil/config.toml",
                r#"
                [vector]
                api_key = "pc-from-toml"
                index_name = "probe-index"
            "#,
            )?;
            let config: VigilConfig = VigilConfig::figment().extract().expect("config");
            assert_eq!(config.vector.api_key, "pc-from-toml");
            assert_eq!(config.vector.index_name, "probe-index");
            Ok(())
        });
    }

    #[test]
    fn env_wins_over_project_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_dir(".vigil")?;
            jail.create_file(".vigil/config.toml", "[llm]\napi_key = \"from-toml\"\n")?;
            jail.set_env("VIGIL_LLM__API_KEY", "from-env");
            let config: VigilConfig = VigilConfig::figment().extract().expect("config");
            assert_eq!(config.llm.api_key, "from-env");
            Ok(())
        });
    }

    #[test]
    fn aliases_fill_only_empty_fields() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("OPENAI_API_KEY", "sk-alias");
            jail.set_env("DEEPGRAM_API_KEY", "dg-alias");
            jail.set_env("VIGIL_DEEPGRAM__API_KEY", "dg-layered");

            let mut config: VigilConfig = VigilConfig::figment().extract().expect("config");
            config.apply_env_aliases();

            // Empty field picked up the alias.
            assert_eq!(config.llm.api_key, "sk-alias");
            // Layered value kept priority over the alias.
            assert_eq!(config.deepgram.api_key, "dg-layered");
            Ok(())
        });
    }

    #[test]
    fn alias_parses_numeric_port() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("REDIS_PORT", "6380");
            let mut config = VigilConfig::default();
            config.apply_env_aliases();
            assert_eq!(config.cache.port, Some(6380));
            Ok(())
        });
    }
}
