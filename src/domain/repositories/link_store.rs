//! Repository trait for short link storage.

use crate::domain::entities::ShortLink;
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Durable keyed storage for short links.
///
/// The backing store MUST enforce a unique constraint on `code`: the
/// distributed lock in front of allocation only reduces contention, it is not
/// the correctness mechanism. Implementations surface a duplicate code as
/// [`AppError::Conflict`].
///
/// `commit` is the uniform durability point: backends that batch writes
/// implement it as a flush, autocommit backends as a no-op. Callers invoke it
/// after their writes instead of probing for a transactional capability.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkStore`] - PostgreSQL
/// - [`crate::infrastructure::persistence::MemoryLinkStore`] - in-process, for
///   tests and embedded deployments
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Persists a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already allocated.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, link: &ShortLink) -> Result<(), AppError>;

    /// Overwrites the stored record with the given state.
    ///
    /// Used by the tracking path to persist attempt-count increments.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record matches `link.id`.
    async fn update(&self, link: &ShortLink) -> Result<(), AppError>;

    /// Checks whether a code is already allocated, expired records included.
    async fn code_exists(&self, code: &str) -> Result<bool, AppError>;

    /// Point lookup by code. Returns expired records too; expiry filtering is
    /// the concern of [`Self::get_original_url`].
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Point lookup by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError>;

    /// Resolves a code to its original URL, applying the expiry filter
    /// internally: an expired record yields `None` even though it exists.
    async fn get_original_url(&self, code: &str) -> Result<Option<String>, AppError>;

    /// Makes preceding writes durable. No-op for autocommit backends.
    async fn commit(&self) -> Result<(), AppError>;
}
