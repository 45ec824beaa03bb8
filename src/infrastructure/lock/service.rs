//! Distributed lock trait and error types.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Errors that can occur during lock operations.
///
/// Unlike cache errors these are not swallowed: a caller that cannot reach
/// the lock store must not proceed as if it held the lock.
#[derive(Debug)]
pub enum LockError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Lock connection error: {}", e),
            Self::OperationError(e) => write!(f, "Lock operation error: {}", e),
        }
    }
}

impl std::error::Error for LockError {}

/// Result type for lock operations.
pub type LockResult<T> = Result<T, LockError>;

/// Mutual exclusion visible across all service instances.
///
/// `try_acquire` associates the key with the caller for at most `ttl`; after
/// the TTL elapses without a `release`, the key becomes acquirable again.
/// TTL expiry is the *only* recovery path for locks leaked by crashed or
/// cancelled holders, so every acquisition must pass a finite,
/// operation-appropriate bound. No fairness is guaranteed among contenders.
///
/// # Implementations
///
/// - [`crate::infrastructure::lock::RedisLock`] - `SET NX PX` over Redis,
///   shared across instances
/// - [`crate::infrastructure::lock::MemoryLock`] - in-process map, for tests
///   and single-instance deployments
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DistributedLock: Send + Sync {
    /// Attempts to acquire `key` for at most `ttl`.
    ///
    /// Returns `Ok(true)` iff the caller obtained exclusive association with
    /// the key; `Ok(false)` means another holder currently owns it.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> LockResult<bool>;

    /// Releases `key`. Idempotent: releasing a key that is not held (already
    /// expired or never acquired) succeeds.
    async fn release(&self, key: &str) -> LockResult<bool>;
}
