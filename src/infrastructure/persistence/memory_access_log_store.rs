//! In-process implementation of the access log store.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::entities::AccessLog;
use crate::domain::repositories::AccessLogStore;
use crate::error::AppError;

/// Append-only in-memory log store for tests and embedded use.
#[derive(Default)]
pub struct MemoryAccessLogStore {
    entries: Mutex<Vec<AccessLog>>,
}

impl MemoryAccessLogStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all persisted entries, in insertion order.
    pub async fn entries(&self) -> Vec<AccessLog> {
        self.entries.lock().await.clone()
    }

    /// Number of persisted entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    /// Returns true when no entries are stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl AccessLogStore for MemoryAccessLogStore {
    async fn create(&self, entry: &AccessLog) -> Result<(), AppError> {
        self.entries.lock().await.push(entry.clone());
        Ok(())
    }

    async fn commit(&self) -> Result<(), AppError> {
        Ok(())
    }
}
