//! Redis-backed distributed lock.

use super::service::{DistributedLock, LockError, LockResult};
use async_trait::async_trait;
use redis::{
    AsyncCommands, Client, ExistenceCheck, SetExpiry, SetOptions, aio::ConnectionManager,
};
use std::time::Duration;
use tracing::{debug, info};

/// Lock coordinator over a shared Redis key space.
///
/// Acquisition is a single atomic `SET key value NX PX ttl`; release is a
/// plain `DEL`. The value carries no ownership token: release is
/// unconditional, matching the idempotent contract (the allocation flow only
/// releases keys it just committed a record under).
pub struct RedisLock {
    client: ConnectionManager,
}

impl RedisLock {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`LockError::ConnectionError`] if the URL is invalid or the
    /// connection cannot be established.
    pub async fn connect(redis_url: &str) -> LockResult<Self> {
        info!("Connecting lock coordinator to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            LockError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            LockError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| LockError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        Ok(Self { client: manager })
    }
}

#[async_trait]
impl DistributedLock for RedisLock {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> LockResult<bool> {
        let mut conn = self.client.clone();

        let options = SetOptions::default()
            .conditional_set(ExistenceCheck::NX)
            .with_expiration(SetExpiry::PX(ttl.as_millis() as u64));

        // SET NX returns nil when the key is already held.
        let reply: Option<String> = conn
            .set_options(key, "locked", options)
            .await
            .map_err(|e| LockError::OperationError(format!("SET NX failed for {}: {}", key, e)))?;

        let acquired = reply.is_some();
        debug!(key, acquired, "lock acquisition attempt");
        Ok(acquired)
    }

    async fn release(&self, key: &str) -> LockResult<bool> {
        let mut conn = self.client.clone();

        conn.del::<_, i64>(key)
            .await
            .map_err(|e| LockError::OperationError(format!("DEL failed for {}: {}", key, e)))?;

        debug!(key, "lock released");
        Ok(true)
    }
}
