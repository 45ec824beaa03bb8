//! Cross-process mutual exclusion over a TTL-capable keyed store.

pub mod memory_lock;
pub mod redis_lock;
pub mod service;

pub use memory_lock::MemoryLock;
pub use redis_lock::RedisLock;
pub use service::{DistributedLock, LockError, LockResult};
