//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// PostgreSQL store for short links.
///
/// The unique index on `code` (see `migrations/`) is the authoritative
/// uniqueness arbiter; a duplicate insert surfaces as [`AppError::Conflict`].
/// Statements run in autocommit mode, so `commit` is a no-op.
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    /// Creates a new store with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ShortLinkRow {
    id: Uuid,
    long_url: String,
    short_url: String,
    code: String,
    created_at: DateTime<Utc>,
    is_expiring: bool,
    expires_at: Option<DateTime<Utc>>,
    attempt_count: i64,
}

impl From<ShortLinkRow> for ShortLink {
    fn from(row: ShortLinkRow) -> Self {
        ShortLink {
            id: row.id,
            long_url: row.long_url,
            short_url: row.short_url,
            code: row.code,
            created_at: row.created_at,
            is_expiring: row.is_expiring,
            expires_at: row.expires_at,
            attempt_count: row.attempt_count,
        }
    }
}

const SELECT_COLUMNS: &str =
    "id, long_url, short_url, code, created_at, is_expiring, expires_at, attempt_count";

#[async_trait]
impl LinkStore for PgLinkStore {
    async fn create(&self, link: &ShortLink) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO short_links
                (id, long_url, short_url, code, created_at, is_expiring, expires_at, attempt_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(link.id)
        .bind(&link.long_url)
        .bind(&link.short_url)
        .bind(&link.code)
        .bind(link.created_at)
        .bind(link.is_expiring)
        .bind(link.expires_at)
        .bind(link.attempt_count)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn update(&self, link: &ShortLink) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE short_links
            SET long_url = $2,
                short_url = $3,
                is_expiring = $4,
                expires_at = $5,
                attempt_count = $6
            WHERE id = $1
            "#,
        )
        .bind(link.id)
        .bind(&link.long_url)
        .bind(&link.short_url)
        .bind(link.is_expiring)
        .bind(link.expires_at)
        .bind(link.attempt_count)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "id": link.id }),
            ));
        }

        Ok(())
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM short_links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM short_links WHERE code = $1"
        ))
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        let row = sqlx::query_as::<_, ShortLinkRow>(&format!(
            "SELECT {SELECT_COLUMNS} FROM short_links WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(ShortLink::from))
    }

    async fn get_original_url(&self, code: &str) -> Result<Option<String>, AppError> {
        // The expiry filter lives here so every caller gets it for free: an
        // expired record exists (its code stays reserved) but does not resolve.
        let url: Option<String> = sqlx::query_scalar(
            r#"
            SELECT long_url FROM short_links
            WHERE code = $1
              AND (is_expiring = FALSE OR expires_at IS NULL OR expires_at > NOW())
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(url)
    }

    async fn commit(&self) -> Result<(), AppError> {
        Ok(())
    }
}
