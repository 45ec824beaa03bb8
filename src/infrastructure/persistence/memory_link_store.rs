//! In-process implementation of the link store.

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// Link store backed by a per-process map keyed by code.
///
/// Enforces the same uniqueness contract as the PostgreSQL store (a
/// duplicate code on `create` is a conflict), so allocator tests exercise
/// the real backstop semantics. Not durable; for tests and embedded use.
#[derive(Default)]
pub struct MemoryLinkStore {
    rows: Mutex<HashMap<String, ShortLink>>,
}

impl MemoryLinkStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    /// Returns true when no records are stored.
    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl LinkStore for MemoryLinkStore {
    async fn create(&self, link: &ShortLink) -> Result<(), AppError> {
        let mut rows = self.rows.lock().await;

        if rows.contains_key(&link.code) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "code": link.code }),
            ));
        }

        rows.insert(link.code.clone(), link.clone());
        Ok(())
    }

    async fn update(&self, link: &ShortLink) -> Result<(), AppError> {
        let mut rows = self.rows.lock().await;

        // Codes are immutable, so the row is addressed by the stored code.
        match rows.get_mut(&link.code) {
            Some(existing) if existing.id == link.id => {
                *existing = link.clone();
                Ok(())
            }
            _ => Err(AppError::not_found(
                "Short link not found",
                json!({ "id": link.id }),
            )),
        }
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.rows.lock().await.contains_key(code))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.rows.lock().await.get(code).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|link| link.id == id)
            .cloned())
    }

    async fn get_original_url(&self, code: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .rows
            .lock()
            .await
            .get(code)
            .filter(|link| !link.is_expired())
            .map(|link| link.long_url.clone()))
    }

    async fn commit(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn link(code: &str, url: &str) -> ShortLink {
        ShortLink::create(
            url.to_string(),
            format!("https://sho.rt/{code}"),
            code.to_string(),
            false,
            None,
        )
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let store = MemoryLinkStore::new();
        let original = link("abc123", "https://example.com");

        store.create(&original).await.unwrap();

        assert!(store.code_exists("abc123").await.unwrap());
        let found = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found, original);

        let by_id = store.find_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(by_id.code, "abc123");
    }

    #[tokio::test]
    async fn test_duplicate_code_is_conflict() {
        let store = MemoryLinkStore::new();

        store.create(&link("abc123", "https://one.com")).await.unwrap();
        let err = store
            .create(&link("abc123", "https://two.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_persists_counter() {
        let store = MemoryLinkStore::new();
        let mut stored = link("abc123", "https://example.com");
        store.create(&stored).await.unwrap();

        stored.increment_attempt_count();
        store.update(&stored).await.unwrap();

        let found = store.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(found.attempt_count, 1);
    }

    #[tokio::test]
    async fn test_update_unknown_link_is_not_found() {
        let store = MemoryLinkStore::new();

        let err = store.update(&link("ghost", "https://example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_expired_record_does_not_resolve_but_exists() {
        let store = MemoryLinkStore::new();
        let mut expired = link("old12345", "https://example.com/old");
        expired.is_expiring = true;
        expired.expires_at = Some(Utc::now() - Duration::hours(1));
        store.create(&expired).await.unwrap();

        assert!(store.code_exists("old12345").await.unwrap());
        assert_eq!(store.get_original_url("old12345").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_live_record_resolves() {
        let store = MemoryLinkStore::new();
        store.create(&link("abc123", "https://example.com/x")).await.unwrap();

        assert_eq!(
            store.get_original_url("abc123").await.unwrap(),
            Some("https://example.com/x".to_string())
        );
    }
}
