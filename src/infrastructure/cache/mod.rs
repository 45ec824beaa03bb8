//! Cache implementations for code resolution.

pub mod memory_cache;
pub mod null_cache;
pub mod redis_cache;
pub mod service;

pub use memory_cache::MemoryCache;
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
