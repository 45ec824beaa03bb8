//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for resolved URLs.
///
/// The cache is an optimization layer with no authority: it must never be
/// treated as a source of truth for existence. Values are plain strings; the
/// resolver stores an empty string as a negative sentinel ("this code does
/// not resolve"), so `Ok(Some(""))` is a hit, not a miss.
///
/// Implementations must be thread-safe and fail open: a cache error degrades
/// to a store lookup, it never fails the request.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed, shared
///   across instances
/// - [`crate::infrastructure::cache::MemoryCache`] - per-process TTL map
/// - [`crate::infrastructure::cache::NullCache`] - no-op for disabled caching
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Retrieves the cached value for a key.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))` on cache hit (the value may be the negative
    ///   sentinel `""`)
    /// - `Ok(None)` on cache miss or error (fail-open behavior)
    async fn get_url(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores a value with optional TTL override.
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers. Implementations log errors
    /// and return `Ok(())` to avoid disrupting the request flow.
    async fn set_url(&self, key: &str, value: &str, ttl_seconds: Option<usize>)
    -> CacheResult<()>;

    /// Removes a cached entry.
    ///
    /// Used when a record is created for a code that may have a stale
    /// negative entry.
    ///
    /// # Errors
    ///
    /// Should not propagate errors to callers.
    async fn invalidate(&self, key: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    ///
    /// Used by health check endpoints to report cache status.
    async fn health_check(&self) -> bool;
}
