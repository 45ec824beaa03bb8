//! PostgreSQL implementation of the access log store.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::AccessLog;
use crate::domain::repositories::AccessLogStore;
use crate::error::AppError;

/// PostgreSQL store for access log entries.
///
/// `link_id` carries no foreign key: entries are historical facts that may
/// outlive the link they reference.
pub struct PgAccessLogStore {
    pool: Arc<PgPool>,
}

impl PgAccessLogStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AccessLogStore for PgAccessLogStore {
    async fn create(&self, entry: &AccessLog) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO access_logs
                (id, link_id, code, ip_address, user_agent, accessed_at, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(entry.id)
        .bind(entry.link_id)
        .bind(&entry.code)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(entry.accessed_at)
        .bind(entry.created_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn commit(&self) -> Result<(), AppError> {
        Ok(())
    }
}
