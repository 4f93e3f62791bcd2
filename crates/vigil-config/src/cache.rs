//! Redis cache configuration.

use serde::{Deserialize, Serialize};

fn default_host() -> String {
    String::from("localhost")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis host. Defaults to localhost so the probe is always attempted;
    /// a missing local Redis shows up as FAIL, not SKIP.
    #[serde(default = "default_host")]
    pub host: String,

    /// Redis port. Defaults to 6379 when unset.
    #[serde(default)]
    pub port: Option<u16>,

    /// Optional password.
    #[serde(default)]
    pub password: String,

    /// Logical database index.
    #[serde(default)]
    pub db: u8,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            password: String::new(),
            db: 0,
        }
    }
}

impl CacheConfig {
    /// Build the `redis://` connection URL.
    #[must_use]
    pub fn url(&self) -> String {
        let port = self.port.unwrap_or(6379);
        if self.password.is_empty() {
            format!("redis://{}:{port}/{}", self.host, self.db)
        } else {
            format!(
                "redis://:{}@{}:{port}/{}",
                urlencoding::encode(&self.password),
                self.host,
                self.db
            )
        }
    }
}
