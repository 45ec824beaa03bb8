//! In-process lock coordinator.

use super::service::{DistributedLock, LockResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Lock coordinator backed by a per-process TTL map.
///
/// Provides the same acquire/expire/release semantics as [`super::RedisLock`]
/// but is visible only within one process. Suitable for single-instance
/// deployments and tests; a multi-instance deployment needs the shared
/// Redis coordinator for correctness.
#[derive(Default)]
pub struct MemoryLock {
    entries: Mutex<HashMap<String, Instant>>,
}

impl MemoryLock {
    /// Creates an empty coordinator.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DistributedLock for MemoryLock {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> LockResult<bool> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        if let Some(deadline) = entries.get(key) {
            if *deadline > now {
                return Ok(false);
            }
            // Held past its TTL: the previous holder leaked it.
            entries.remove(key);
        }

        entries.insert(key.to_string(), now + ttl);
        Ok(true)
    }

    async fn release(&self, key: &str) -> LockResult<bool> {
        self.entries.lock().await.remove(key);
        Ok(true)
    }
}
