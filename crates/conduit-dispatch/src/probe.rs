//! Reachability probes for local inference engines

use std::time::Duration;

use mini_moka::sync::Cache;
use reqwest::Client;

use crate::health::EngineStatus;

/// TTL cache of endpoint reachability, keyed by probe URL
///
/// Concurrent probes for the same key may both hit the network; the last
/// write wins and every reader converges within one TTL window.
#[derive(Clone)]
pub struct AvailabilityCache {
    client: Client,
    cache: Cache<String, bool>,
    timeout: Duration,
}

impl AvailabilityCache {
    pub fn new(client: Client, ttl: Duration, timeout: Duration) -> Self {
        Self {
            client,
            cache: Cache::builder().max_capacity(64).time_to_live(ttl).build(),
            timeout,
        }
    }

    /// Cached reachability of `url`, probing on a miss
    pub async fn is_available(&self, url: &str) -> bool {
        if let Some(available) = self.cache.get(&url.to_owned()) {
            return available;
        }

        let available = self.probe(url).await == EngineStatus::Healthy;
        self.cache.insert(url.to_owned(), available);
        available
    }

    /// Uncached probe
    pub async fn probe(&self, url: &str) -> EngineStatus {
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) if response.status().is_success() => EngineStatus::Healthy,
            Ok(response) => {
                tracing::debug!(url, status = %response.status(), "probe returned non-success");
                EngineStatus::Unhealthy
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "probe failed");
                EngineStatus::Unavailable
            }
        }
    }

    /// Drop a cached entry so the next check probes again
    pub fn invalidate(&self, url: &str) {
        self.cache.invalidate(&url.to_owned());
    }

    #[cfg(test)]
    fn record(&self, url: &str, available: bool) {
        self.cache.insert(url.to_owned(), available);
    }
}

impl std::fmt::Debug for AvailabilityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AvailabilityCache")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
