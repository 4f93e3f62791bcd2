//! Firestore document database probe over the REST API.
//!
//! Round-trip: create a document in a throwaway collection, read it back,
//! delete it. Against the emulator no token is sent; against production the
//! configured OAuth access token is passed through.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use vigil_config::DocstoreConfig;

use crate::error::ProbeError;
use crate::http::check_response;

const PROBE_COLLECTION: &str = "_vigil_probe";

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: serde_json::Map<String, serde_json::Value>,
}

/// REST client for the Firestore round-trip probe.
pub struct DocstoreClient {
    http: reqwest::Client,
    config: DocstoreConfig,
}

impl DocstoreClient {
    /// Create a client with a 10 s request timeout.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new(config: DocstoreConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("reqwest client should build"),
            config,
        }
    }

    /// Write, read back and delete a probe document.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if any of the three requests fails or the
    /// document reads back without the probe field.
    pub async fn round_trip(&self) -> Result<(), ProbeError> {
        let base = self.config.base_url();
        let docs = self.config.documents_path();
        let doc_id = format!("probe-{}", chrono::Utc::now().timestamp_millis());

        let create_url =
            format!("{base}/{docs}/{PROBE_COLLECTION}?documentId={doc_id}");
        let body = json!({
            "fields": {
                "probe": { "booleanValue": true },
                "timestamp": { "stringValue": chrono::Utc::now().to_rfc3339() },
            }
        });
        let resp = self
            .authorized(self.http.post(&create_url))
            .json(&body)
            .send()
            .await?;
        check_response(resp).await?;

        let doc_url = format!("{base}/{docs}/{PROBE_COLLECTION}/{doc_id}");
        let resp = self.authorized(self.http.get(&doc_url)).send().await?;
        let resp = check_response(resp).await?;
        let doc: FirestoreDocument = resp.json().await?;
        if !doc.fields.contains_key("probe") {
            return Err(ProbeError::Parse(format!(
                "document {} read back without probe field",
                doc.name
            )));
        }

        let resp = self.authorized(self.http.delete(&doc_url)).send().await?;
        check_response(resp).await?;
        Ok(())
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        // The emulator takes unauthenticated requests.
        if self.config.access_token.is_empty() || !self.config.emulator_host.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.config.access_token)
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{method, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn emulator_config(server: &MockServer) -> DocstoreConfig {
        DocstoreConfig {
            project_id: String::from("demo"),
            emulator_host: server
                .uri()
                .trim_start_matches("http://")
                .to_string(),
            ..DocstoreConfig::default()
        }
    }

    fn document_body() -> serde_json::Value {
        json!({
            "name": "projects/demo/databases/(default)/documents/_vigil_probe/probe-1",
            "fields": {
                "probe": { "booleanValue": true },
                "timestamp": { "stringValue": "2026-01-01T00:00:00Z" },
            }
        })
    }

    #[test]
    fn parse_document_fixture() {
        let doc: FirestoreDocument = serde_json::from_value(document_body()).unwrap();
        assert!(doc.fields.contains_key("probe"));
        assert_eq!(
            doc.name,
            "projects/demo/databases/(default)/documents/_vigil_probe/probe-1"
        );
    }

    #[tokio::test]
    async fn round_trip_issues_create_get_delete() {
        let server = MockServer::start().await;
        let docs_path = "/v1/projects/demo/databases/\\(default\\)/documents/_vigil_probe";

        Mock::given(method("POST"))
            .and(path_regex(docs_path.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(document_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path_regex(format!("{docs_path}/probe-.*")))
            .respond_with(ResponseTemplate::new(200).set_body_json(document_body()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path_regex(format!("{docs_path}/probe-.*")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = DocstoreClient::new(emulator_config(&server));
        client.round_trip().await.unwrap();
    }

    #[tokio::test]
    async fn missing_probe_field_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "projects/demo/databases/(default)/documents/_vigil_probe/probe-1",
                "fields": {}
            })))
            .mount(&server)
            .await;

        let client = DocstoreClient::new(emulator_config(&server));
        let err = client.round_trip().await.unwrap_err();
        assert!(matches!(err, ProbeError::Parse(_)));
    }
}
