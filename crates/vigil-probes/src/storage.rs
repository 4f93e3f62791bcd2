//! Object-storage bucket probe.
//!
//! Verifies the configured bucket exists and is listable with the ambient
//! credentials. One shallow list is enough: a missing bucket or bad
//! credentials both surface as errors here.

use object_store::ObjectStore;
use object_store::aws::AmazonS3Builder;

use vigil_config::StorageConfig;

use crate::error::ProbeError;

/// Bucket-level view of a shallow list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketSummary {
    /// Objects at the bucket root.
    pub objects: usize,
    /// Top-level prefixes ("directories") at the bucket root.
    pub prefixes: usize,
}

/// S3-compatible client for the bucket probe.
#[derive(Debug)]
pub struct StorageClient {
    store: object_store::aws::AmazonS3,
    bucket: String,
}

impl StorageClient {
    /// Build a client for the configured bucket.
    ///
    /// Credentials come from the environment (the usual `AWS_*` variables)
    /// unless the configuration overrides them. A custom endpoint allows
    /// plain HTTP so local S3-compatible emulators work.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::MissingConfig`] when no bucket is configured
    /// and [`ProbeError::Storage`] if the builder rejects the configuration.
    pub fn new(config: &StorageConfig) -> Result<Self, ProbeError> {
        if config.bucket.is_empty() {
            return Err(ProbeError::MissingConfig("storage.bucket"));
        }
        let mut builder = AmazonS3Builder::from_env()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region);
        if !config.endpoint.is_empty() {
            builder = builder
                .with_endpoint(&config.endpoint)
                .with_allow_http(true);
        }
        if !config.access_key_id.is_empty() {
            builder = builder.with_access_key_id(&config.access_key_id);
        }
        if !config.secret_access_key.is_empty() {
            builder = builder.with_secret_access_key(&config.secret_access_key);
        }
        Ok(Self {
            store: builder.build()?,
            bucket: config.bucket.clone(),
        })
    }

    /// The bucket this client probes.
    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Shallow-list the bucket root to confirm it is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Storage`] if the bucket does not exist or the
    /// credentials cannot list it.
    pub async fn bucket_accessible(&self) -> Result<BucketSummary, ProbeError> {
        let listing = self.store.list_with_delimiter(None).await?;
        Ok(BucketSummary {
            objects: listing.objects.len(),
            prefixes: listing.common_prefixes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_config() -> StorageConfig {
        StorageConfig {
            bucket: String::from("vigil-probe"),
            endpoint: String::from("http://localhost:9000"),
            access_key_id: String::from("minioadmin"),
            secret_access_key: String::from("minioadmin"),
            ..StorageConfig::default()
        }
    }

    #[test]
    fn client_builds_with_explicit_credentials() {
        let client = StorageClient::new(&local_config()).unwrap();
        assert_eq!(client.bucket(), "vigil-probe");
    }

    #[test]
    fn empty_bucket_name_is_rejected() {
        let config = StorageConfig::default();
        let err = StorageClient::new(&config).unwrap_err();
        assert!(matches!(err, ProbeError::MissingConfig(_)));
    }

    #[tokio::test]
    #[ignore] // requires a local S3-compatible endpoint
    async fn live_bucket_listing() {
        let client = StorageClient::new(&local_config()).unwrap();
        client.bucket_accessible().await.unwrap();
    }
}
