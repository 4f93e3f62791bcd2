//! `vgl services` — probe every configured external service.
//!
//! Probes run sequentially in a fixed order. Services without the required
//! configuration report SKIP; only attempted-and-failed probes count against
//! the exit code.

use vigil_config::VigilConfig;
use vigil_core::ProbeReport;
use vigil_probes::cache::CacheClient;
use vigil_probes::docstore::DocstoreClient;
use vigil_probes::embedding::EmbeddingClient;
use vigil_probes::llm::{LlmClient, SMOKE_PROMPT, StructuredOutcome};
use vigil_probes::storage::StorageClient;
use vigil_probes::stt::{DeepgramClient, KeyCheck};
use vigil_probes::vector::VectorClient;

pub async fn handle(config: &VigilConfig) -> ProbeReport {
    let mut report = ProbeReport::default();
    probe_llm(config, &mut report).await;
    probe_embedding(config, &mut report).await;
    probe_cache(config, &mut report).await;
    probe_docstore(config, &mut report).await;
    probe_storage(config, &mut report).await;
    probe_vector(config, &mut report).await;
    probe_deepgram_key(config, &mut report).await;
    report
}

async fn probe_llm(config: &VigilConfig, report: &mut ProbeReport) {
    if !config.llm.is_configured() {
        report.skip("LLM Basic", "OPENAI_API_KEY not set");
        report.skip("LLM Structured", "OPENAI_API_KEY not set");
        return;
    }
    let client = LlmClient::new(config.llm.clone());

    match client.complete(SMOKE_PROMPT).await {
        Ok(content) => report.ok("LLM Basic", content),
        Err(error) => report.fail("LLM Basic", error.to_string()),
    }

    match client.structured().await {
        Ok(StructuredOutcome::Schema(summary)) => report.ok(
            "LLM Structured",
            format!("schema-constrained output parsed: {}", summary.title),
        ),
        Ok(StructuredOutcome::Fallback(value)) => report.ok(
            "LLM Structured",
            format!("fallback JSON parsed: {value}"),
        ),
        Err(error) => report.fail("LLM Structured", error.to_string()),
    }
}

async fn probe_embedding(config: &VigilConfig, report: &mut ProbeReport) {
    if !config.embedding.is_configured() {
        report.skip("Doubao Embedding", "DOUBAO_API_KEY not set");
        return;
    }
    let dimensions = config.embedding.dimensions;
    let client = EmbeddingClient::new(config.embedding.clone());
    let embedding = client.embed("Hello World 你好世界").await;
    if embedding.degraded {
        report.fail(
            "Doubao Embedding",
            "all attempts failed, degraded to zero vector",
        );
    } else {
        report.ok(
            "Doubao Embedding",
            format!("{dimensions}-dimensional embedding returned"),
        );
    }
}

async fn probe_cache(config: &VigilConfig, report: &mut ProbeReport) {
    // The cache is assumed present in every deployment, so an unreachable
    // Redis is FAIL rather than SKIP.
    let client = match CacheClient::new(&config.cache) {
        Ok(client) => client,
        Err(error) => {
            report.fail("Redis", error.to_string());
            return;
        }
    };
    if let Err(error) = client.ping().await {
        report.fail("Redis", error.to_string());
        return;
    }
    match client.round_trip().await {
        Ok(()) => report.ok("Redis", "PING + set/get/delete round-trip successful"),
        Err(error) => report.fail("Redis", error.to_string()),
    }
}

async fn probe_docstore(config: &VigilConfig, report: &mut ProbeReport) {
    if !config.docstore.is_configured() {
        report.skip("Firestore", "GOOGLE_CLOUD_PROJECT not set");
        return;
    }
    let client = DocstoreClient::new(config.docstore.clone());
    match client.round_trip().await {
        Ok(()) => report.ok("Firestore", "write/read/delete round-trip successful"),
        Err(error) => report.fail("Firestore", error.to_string()),
    }
}

async fn probe_storage(config: &VigilConfig, report: &mut ProbeReport) {
    if !config.storage.is_configured() {
        report.skip("Cloud Storage", "BUCKET_PRIVATE_CLOUD_SYNC not set");
        return;
    }
    let client = match StorageClient::new(&config.storage) {
        Ok(client) => client,
        Err(error) => {
            report.fail("Cloud Storage", error.to_string());
            return;
        }
    };
    match client.bucket_accessible().await {
        Ok(summary) => report.ok(
            "Cloud Storage",
            format!(
                "bucket '{}' reachable ({} objects, {} prefixes at root)",
                client.bucket(),
                summary.objects,
                summary.prefixes
            ),
        ),
        Err(error) => report.fail("Cloud Storage", error.to_string()),
    }
}

async fn probe_vector(config: &VigilConfig, report: &mut ProbeReport) {
    if !config.vector.is_configured() {
        report.skip("Pinecone", "PINECONE_API_KEY not set");
        return;
    }
    let client = VectorClient::new(config.vector.clone());

    match client.list_indexes().await {
        Ok(summary) if summary.index_found => report.ok(
            "Pinecone",
            format!(
                "index '{}' found ({} indexes total)",
                config.vector.index_name, summary.index_count
            ),
        ),
        Ok(summary) => report.fail(
            "Pinecone",
            format!(
                "index '{}' not among the {} indexes",
                config.vector.index_name, summary.index_count
            ),
        ),
        Err(error) => {
            report.fail("Pinecone", error.to_string());
            return;
        }
    }

    if config.vector.index_host.is_empty() {
        report.skip("Pinecone Query", "PINECONE_INDEX_HOST not set");
        return;
    }
    match client.query_by_metadata(&config.backend.uid).await {
        Ok(matches) => report.ok(
            "Pinecone Query",
            format!("metadata-filtered query returned {} matches", matches.len()),
        ),
        Err(error) => report.fail("Pinecone Query", error.to_string()),
    }
}

async fn probe_deepgram_key(config: &VigilConfig, report: &mut ProbeReport) {
    if !config.deepgram.is_configured() {
        report.skip("Deepgram Key", "DEEPGRAM_API_KEY not set");
        return;
    }
    let client = DeepgramClient::new(config.deepgram.clone());
    match client.check_key().await {
        Ok(KeyCheck::Valid { projects }) => report.ok(
            "Deepgram Key",
            format!("key accepted ({projects} projects visible)"),
        ),
        Ok(KeyCheck::Invalid) => report.fail("Deepgram Key", "key rejected (401/403)"),
        Ok(KeyCheck::Unverified { status }) => report.ok(
            "Deepgram Key",
            format!("projects endpoint answered {status}; key not verified"),
        ),
        Err(error) => report.fail("Deepgram Key", error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use vigil_core::ProbeStatus;

    use super::*;

    #[tokio::test]
    async fn unconfigured_services_skip_without_network() {
        // Nothing configured except the cache, which always attempts and
        // fails fast against a port nobody listens on.
        let config = VigilConfig {
            cache: vigil_config::CacheConfig {
                host: String::from("127.0.0.1"),
                port: Some(1),
                ..vigil_config::CacheConfig::default()
            },
            ..VigilConfig::default()
        };
        let report = handle(&config).await;

        let statuses: Vec<(String, ProbeStatus)> = report
            .outcomes()
            .iter()
            .map(|o| (o.component.clone(), o.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                (String::from("LLM Basic"), ProbeStatus::Skip),
                (String::from("LLM Structured"), ProbeStatus::Skip),
                (String::from("Doubao Embedding"), ProbeStatus::Skip),
                (String::from("Redis"), ProbeStatus::Fail),
                (String::from("Firestore"), ProbeStatus::Skip),
                (String::from("Cloud Storage"), ProbeStatus::Skip),
                (String::from("Pinecone"), ProbeStatus::Skip),
                (String::from("Deepgram Key"), ProbeStatus::Skip),
            ]
        );
    }
}
