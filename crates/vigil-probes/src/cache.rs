//! Redis cache probe.

use redis::AsyncCommands;

use vigil_config::CacheConfig;

use crate::error::ProbeError;

/// Redis client wrapper for the cache probes.
pub struct CacheClient {
    client: redis::Client,
}

impl CacheClient {
    /// Build a client from the cache configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Cache`] if the connection URL is invalid.
    pub fn new(config: &CacheConfig) -> Result<Self, ProbeError> {
        Ok(Self {
            client: redis::Client::open(config.url())?,
        })
    }

    /// PING the server.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] if the connection fails or the server does not
    /// answer PONG.
    pub async fn ping(&self) -> Result<(), ProbeError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong != "PONG" {
            return Err(ProbeError::Parse(format!(
                "unexpected PING reply: {pong}"
            )));
        }
        Ok(())
    }

    /// Set-with-expiry / get / delete round-trip under a throwaway key.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] on any command failure or when the value read
    /// back does not match what was written.
    pub async fn round_trip(&self) -> Result<(), ProbeError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let key = format!("vigil_probe_{}", chrono::Utc::now().timestamp());

        let _: () = conn.set_ex(&key, "probe_value", 10).await?;
        let value: Option<String> = conn.get(&key).await?;
        let _: () = conn.del(&key).await?;

        match value.as_deref() {
            Some("probe_value") => Ok(()),
            other => Err(ProbeError::Parse(format!(
                "cache returned unexpected value: {other:?}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_url_is_rejected_at_construction() {
        let config = CacheConfig {
            host: String::from("not a host name"),
            ..CacheConfig::default()
        };
        assert!(CacheClient::new(&config).is_err());
    }

    #[tokio::test]
    #[ignore] // requires a local Redis
    async fn live_ping_and_round_trip() {
        let client = CacheClient::new(&CacheConfig::default()).unwrap();
        client.ping().await.unwrap();
        client.round_trip().await.unwrap();
    }
}
