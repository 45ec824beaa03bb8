//! Repository trait for access log storage.

use crate::domain::entities::AccessLog;
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only storage for access log entries.
///
/// Entries are immutable historical facts; there is no update or delete.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAccessLogStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryAccessLogStore`] - in-process
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccessLogStore: Send + Sync {
    /// Persists one access log entry.
    async fn create(&self, entry: &AccessLog) -> Result<(), AppError>;

    /// Makes preceding writes durable. No-op for autocommit backends.
    async fn commit(&self) -> Result<(), AppError>;
}
