//! Storage backends for short links and access logs.

pub mod memory_access_log_store;
pub mod memory_link_store;
pub mod pg_access_log_store;
pub mod pg_link_store;

pub use memory_access_log_store::MemoryAccessLogStore;
pub use memory_link_store::MemoryLinkStore;
pub use pg_access_log_store::PgAccessLogStore;
pub use pg_link_store::PgLinkStore;
