//! Firestore document database configuration.
//!
//! The probe drives the Firestore REST API directly; against the emulator no
//! credentials are needed, against production an OAuth access token is passed
//! through as-is.

use serde::{Deserialize, Serialize};

fn default_database() -> String {
    String::from("(default)")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocstoreConfig {
    /// Google Cloud project ID.
    #[serde(default)]
    pub project_id: String,

    /// Firestore database ID.
    #[serde(default = "default_database")]
    pub database: String,

    /// Emulator host (`host:port`). When set, requests go to the emulator
    /// over plain HTTP and no token is sent.
    #[serde(default)]
    pub emulator_host: String,

    /// OAuth2 access token for the production REST API.
    #[serde(default)]
    pub access_token: String,
}

impl Default for DocstoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: default_database(),
            emulator_host: String::new(),
            access_token: String::new(),
        }
    }
}

impl DocstoreConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.project_id.is_empty()
    }

    /// REST base URL: emulator when configured, production otherwise.
    #[must_use]
    pub fn base_url(&self) -> String {
        if self.emulator_host.is_empty() {
            String::from("https://firestore.googleapis.com/v1")
        } else {
            format!("http://{}/v1", self.emulator_host)
        }
    }

    /// Path prefix of the documents resource for this project and database.
    #[must_use]
    pub fn documents_path(&self) -> String {
        format!(
            "projects/{}/databases/{}/documents",
            self.project_id, self.database
        )
    }
}
