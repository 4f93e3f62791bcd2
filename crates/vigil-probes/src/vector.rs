//! Pinecone vector database probe.
//!
//! Two exercises: list the indexes on the control plane and confirm the
//! configured index is present, then run a metadata-filtered query against
//! the index host on the data plane.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use vigil_config::VectorConfig;

use crate::error::ProbeError;
use crate::http::check_response;

const CONTROL_PLANE: &str = "https://api.pinecone.io";

/// Control-plane view of the account's indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSummary {
    /// How many indexes the account has.
    pub index_count: usize,
    /// Whether the configured index name is among them.
    pub index_found: bool,
}

/// One match from a data-plane query.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexEntry>,
}

#[derive(Deserialize)]
struct IndexEntry {
    name: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

/// HTTP client for the Pinecone probes.
pub struct VectorClient {
    http: reqwest::Client,
    config: VectorConfig,
    control_plane: String,
}

impl VectorClient {
    /// Create a client with a 15 s request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: VectorConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(15))
                .build()
                .expect("reqwest client should build"),
            config,
            control_plane: String::from(CONTROL_PLANE),
        }
    }

    /// Point the control-plane calls at a different base URL. Tests use this.
    #[must_use]
    pub fn with_control_plane(mut self, base: impl Into<String>) -> Self {
        self.control_plane = base.into();
        self
    }

    /// List indexes and check the configured one is present.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the request fails or the API key is
    /// rejected.
    pub async fn list_indexes(&self) -> Result<IndexSummary, ProbeError> {
        let resp = self
            .http
            .get(format!("{}/indexes", self.control_plane))
            .header("Api-Key", &self.config.api_key)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let list: IndexList = resp.json().await?;
        Ok(IndexSummary {
            index_count: list.indexes.len(),
            index_found: list.indexes.iter().any(|i| i.name == self.config.index_name),
        })
    }

    /// Query the index host with a fixed vector and a metadata filter on the
    /// given user id. Zero matches is a valid outcome.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if no index host is configured or the query
    /// fails.
    pub async fn query_by_metadata(&self, uid: &str) -> Result<Vec<QueryMatch>, ProbeError> {
        if self.config.index_host.is_empty() {
            return Err(ProbeError::MissingConfig("vector.index_host"));
        }
        let body = json!({
            "vector": vec![0.1_f32; self.config.dimensions],
            "topK": 5,
            "includeMetadata": true,
            "filter": { "uid": { "$eq": uid } },
        });
        let resp = self
            .http
            .post(format!("{}/query", query_url(&self.config.index_host)))
            .header("Api-Key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let resp = check_response(resp).await?;
        let data: QueryResponse = resp.json().await?;
        Ok(data.matches)
    }
}

/// Index hosts come back from the control plane without a scheme.
fn query_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.trim_end_matches('/').to_string()
    } else {
        format!("https://{}", host.trim_end_matches('/'))
    }
}
