//! Object storage configuration (S3-compatible bucket).

use serde::{Deserialize, Serialize};

fn default_region() -> String {
    String::from("auto")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Bucket name. Empty means the storage integration is disabled.
    #[serde(default)]
    pub bucket: String,

    /// Custom S3-compatible endpoint URL (GCS interop, R2, MinIO). Empty
    /// means the provider default endpoint.
    #[serde(default)]
    pub endpoint: String,

    /// Access key ID.
    #[serde(default)]
    pub access_key_id: String,

    /// Secret access key.
    #[serde(default)]
    pub secret_access_key: String,

    /// Region identifier.
    #[serde(default = "default_region")]
    pub region: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            endpoint: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: default_region(),
        }
    }
}

impl StorageConfig {
    /// The bucket name is the switch; credentials may come from the ambient
    /// environment when empty.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.bucket.is_empty()
    }
}
