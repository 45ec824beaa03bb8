//! In-process TTL cache.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Per-process cache backed by a TTL map.
///
/// Not shared across instances, so it is only suitable for single-instance
/// deployments and tests. Expired entries are dropped lazily on read.
pub struct MemoryCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    default_ttl: Duration,
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryCache {
    /// Creates an empty cache with the given default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            default_ttl,
        }
    }
}

#[async_trait]
impl CacheService for MemoryCache {
    async fn get_url(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock().await;

        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn set_url(&self, key: &str, value: &str, ttl: Option<usize>) -> CacheResult<()> {
        let ttl = ttl
            .map(|secs| Duration::from_secs(secs as u64))
            .unwrap_or(self.default_ttl);

        let mut entries = self.entries.lock().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + ttl,
            },
        );

        Ok(())
    }

    async fn invalidate(&self, key: &str) -> CacheResult<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
