//! Short link creation and resolution service.
//!
//! Owns the two hot paths of the system: coordinated code allocation
//! (generate → lock → existence check → persist) and cache-aside resolution
//! with negative caching.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::domain::entities::ShortLink;
use crate::domain::repositories::LinkStore;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::lock::DistributedLock;
use crate::utils::code_generator::CodeGenerator;

/// Cache keys are `shortlink:` + code.
const CACHE_KEY_PREFIX: &str = "shortlink:";
/// Lock keys are `shortLinkCodeLock:` + candidate code.
const CODE_LOCK_KEY_PREFIX: &str = "shortLinkCodeLock:";

/// Longest accepted original URL.
const MAX_URL_LENGTH: usize = 2048;

/// Tunables for allocation and caching.
#[derive(Debug, Clone)]
pub struct ShortLinkSettings {
    /// Public base for derived short URLs.
    pub base_url: String,
    /// TTL for per-candidate allocation locks. Stale locks left behind by
    /// losing attempts or crashed allocators expire on their own after this
    /// bound; there is no cleanup logic on the failure path.
    pub code_lock_ttl: Duration,
    /// Allocation surfaces a hard failure after this many candidates,
    /// bounding tail latency under sustained contention.
    pub max_allocation_attempts: usize,
}

impl Default for ShortLinkSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            code_lock_ttl: Duration::from_secs(600),
            max_allocation_attempts: 16,
        }
    }
}

/// Result of a creation request.
#[derive(Debug, Clone)]
pub struct CreateShortLinkResponse {
    pub short_url: String,
    pub code: String,
    pub success: bool,
}

/// Result of a resolution request.
///
/// `found` is false exactly when `original_url` is blank: unknown and
/// expired codes are expected outcomes, not errors.
#[derive(Debug, Clone)]
pub struct GetOriginalUrlResponse {
    pub original_url: String,
    pub found: bool,
}

/// Service for creating and resolving short links.
///
/// Generic over the store, which is authoritative for uniqueness; the cache,
/// lock, and code generator are swappable collaborators.
pub struct ShortLinkService<S: LinkStore> {
    store: Arc<S>,
    cache: Arc<dyn CacheService>,
    lock: Arc<dyn DistributedLock>,
    generator: Arc<dyn CodeGenerator>,
    settings: ShortLinkSettings,
}

impl<S: LinkStore> ShortLinkService<S> {
    /// Creates a new service.
    pub fn new(
        store: Arc<S>,
        cache: Arc<dyn CacheService>,
        lock: Arc<dyn DistributedLock>,
        generator: Arc<dyn CodeGenerator>,
        settings: ShortLinkSettings,
    ) -> Self {
        Self {
            store,
            cache,
            lock,
            generator,
            settings,
        }
    }

    /// Creates a short link for `long_url`.
    ///
    /// Allocates a globally unique code (see [`Self::allocate_code`]),
    /// persists the record, invalidates any stale cached negative entry for
    /// the code, and releases the allocation lock. Lock release is
    /// best-effort: the record is already durable, and an unreleased key
    /// merely blocks that candidate until its TTL lapses.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed or oversized URL, or
    /// an expiring link without a deadline. Returns [`AppError::Internal`]
    /// when the candidate space is exhausted or infrastructure fails.
    pub async fn create_short_link(
        &self,
        long_url: String,
        is_expiring: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<CreateShortLinkResponse, AppError> {
        validate_long_url(&long_url)?;

        if is_expiring && expires_at.is_none() {
            return Err(AppError::bad_request(
                "Expiring links require expires_at",
                json!({}),
            ));
        }

        let code = self.allocate_code().await?;
        let short_url = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            code
        );

        let link = ShortLink::create(
            long_url,
            short_url.clone(),
            code.clone(),
            is_expiring,
            expires_at,
        );

        self.store.create(&link).await?;
        self.store.commit().await?;

        // A previous resolve for this code may have cached the negative
        // sentinel; drop it so the new mapping is visible immediately.
        if let Err(e) = self.cache.invalidate(&cache_key(&code)).await {
            warn!(%code, error = %e, "failed to invalidate cache after create");
        }

        if let Err(e) = self.lock.release(&lock_key(&code)).await {
            warn!(%code, error = %e, "failed to release allocation lock; TTL will reclaim it");
        }

        Ok(CreateShortLinkResponse {
            short_url,
            code,
            success: true,
        })
    }

    /// Resolves a code to its original URL through the cache.
    ///
    /// Cache values are authoritative for the TTL window only: a non-empty
    /// string is the resolved URL, the empty string is a cached "not found".
    /// On a miss the store is consulted with its expiry filter applied, and
    /// the answer (including the negative sentinel) is written back so
    /// repeated lookups of unknown codes skip the store.
    ///
    /// Concurrent misses for the same code may each query the store and each
    /// write the cache; the computation is idempotent and the last write
    /// wins, so no mutual exclusion is needed here.
    pub async fn get_original_url(&self, code: &str) -> Result<GetOriginalUrlResponse, AppError> {
        let key = cache_key(code);

        let value = match self.cache.get_url(&key).await {
            Ok(Some(cached)) => cached,
            Ok(None) => self.resolve_and_populate(code, &key).await?,
            Err(e) => {
                // Fail open: a broken cache degrades to store lookups.
                warn!(code, error = %e, "cache read failed; falling back to store");
                self.resolve_and_populate(code, &key).await?
            }
        };

        let found = !value.trim().is_empty();
        Ok(GetOriginalUrlResponse {
            original_url: value,
            found,
        })
    }

    async fn resolve_and_populate(&self, code: &str, key: &str) -> Result<String, AppError> {
        let value = self
            .store
            .get_original_url(code)
            .await?
            .unwrap_or_default();

        if let Err(e) = self.cache.set_url(key, &value, None).await {
            warn!(code, error = %e, "failed to populate cache");
        }

        Ok(value)
    }

    /// Allocates a code guaranteed unique in the store.
    ///
    /// Each attempt generates a fresh candidate, then tries to acquire the
    /// cross-process lock for it:
    ///
    /// - lock refused → another allocator is racing on this candidate; the
    ///   store is not touched and a new candidate is drawn
    /// - lock held, code exists → allocated by a previous winner; the stale
    ///   lock is deliberately *not* released (it self-expires) and a new
    ///   candidate is drawn
    /// - lock held, code free → this attempt wins
    ///
    /// Contention and collision recover locally; infrastructure errors
    /// propagate immediately.
    async fn allocate_code(&self) -> Result<String, AppError> {
        for attempt in 1..=self.settings.max_allocation_attempts {
            let candidate = self.generator.generate();

            let acquired = self
                .lock
                .try_acquire(&lock_key(&candidate), self.settings.code_lock_ttl)
                .await?;

            if !acquired {
                debug!(%candidate, attempt, "allocation lock contended; retrying");
                continue;
            }

            if self.store.code_exists(&candidate).await? {
                debug!(%candidate, attempt, "candidate already allocated; retrying");
                continue;
            }

            return Ok(candidate);
        }

        Err(AppError::internal(
            "Failed to allocate a unique code",
            json!({ "attempts": self.settings.max_allocation_attempts }),
        ))
    }
}

fn cache_key(code: &str) -> String {
    format!("{}{}", CACHE_KEY_PREFIX, code)
}

fn lock_key(code: &str) -> String {
    format!("{}{}", CODE_LOCK_KEY_PREFIX, code)
}

fn validate_long_url(long_url: &str) -> Result<(), AppError> {
    if long_url.len() > MAX_URL_LENGTH {
        return Err(AppError::bad_request(
            "URL is too long",
            json!({ "max_length": MAX_URL_LENGTH, "provided_length": long_url.len() }),
        ));
    }

    let parsed = Url::parse(long_url).map_err(|e| {
        AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(AppError::bad_request(
            "URL must use http or https",
            json!({ "scheme": parsed.scheme() }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkStore;
    use crate::infrastructure::cache::service::MockCacheService;
    use crate::infrastructure::lock::service::MockDistributedLock;
    use crate::utils::code_generator::MockCodeGenerator;
    use mockall::predicate::eq;

    fn settings() -> ShortLinkSettings {
        ShortLinkSettings {
            base_url: "https://sho.rt".to_string(),
            code_lock_ttl: Duration::from_secs(600),
            max_allocation_attempts: 4,
        }
    }

    fn fixed_generator(codes: Vec<&'static str>) -> MockCodeGenerator {
        let mut generator = MockCodeGenerator::new();
        let mut iter = codes.into_iter();
        generator
            .expect_generate()
            .returning(move || iter.next().expect("generator exhausted").to_string());
        generator
    }

    fn permissive_cache() -> MockCacheService {
        let mut cache = MockCacheService::new();
        cache.expect_invalidate().returning(|_| Ok(()));
        cache.expect_set_url().returning(|_, _, _| Ok(()));
        cache.expect_get_url().returning(|_| Ok(None));
        cache
    }

    #[tokio::test]
    async fn test_create_short_link_success() {
        let mut store = MockLinkStore::new();
        let mut lock = MockDistributedLock::new();

        lock.expect_try_acquire()
            .with(eq("shortLinkCodeLock:abc123"), eq(Duration::from_secs(600)))
            .times(1)
            .returning(|_, _| Ok(true));
        lock.expect_release()
            .with(eq("shortLinkCodeLock:abc123"))
            .times(1)
            .returning(|_| Ok(true));

        store
            .expect_code_exists()
            .with(eq("abc123"))
            .times(1)
            .returning(|_| Ok(false));
        store
            .expect_create()
            .withf(|link| {
                link.code == "abc123"
                    && link.long_url == "https://example.com/x"
                    && link.short_url == "https://sho.rt/abc123"
            })
            .times(1)
            .returning(|_| Ok(()));
        store.expect_commit().times(1).returning(|| Ok(()));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(permissive_cache()),
            Arc::new(lock),
            Arc::new(fixed_generator(vec!["abc123"])),
            settings(),
        );

        let response = service
            .create_short_link("https://example.com/x".to_string(), false, None)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.code, "abc123");
        assert_eq!(response.short_url, "https://sho.rt/abc123");
    }

    #[tokio::test]
    async fn test_contention_retries_without_touching_store() {
        let mut store = MockLinkStore::new();
        let mut lock = MockDistributedLock::new();

        // First candidate is contended: the store must not be consulted for it.
        lock.expect_try_acquire()
            .with(eq("shortLinkCodeLock:taken1"), eq(Duration::from_secs(600)))
            .times(1)
            .returning(|_, _| Ok(false));
        lock.expect_try_acquire()
            .with(eq("shortLinkCodeLock:fresh2"), eq(Duration::from_secs(600)))
            .times(1)
            .returning(|_, _| Ok(true));
        lock.expect_release()
            .with(eq("shortLinkCodeLock:fresh2"))
            .times(1)
            .returning(|_| Ok(true));

        store
            .expect_code_exists()
            .with(eq("fresh2"))
            .times(1)
            .returning(|_| Ok(false));
        store.expect_create().times(1).returning(|_| Ok(()));
        store.expect_commit().times(1).returning(|| Ok(()));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(permissive_cache()),
            Arc::new(lock),
            Arc::new(fixed_generator(vec!["taken1", "fresh2"])),
            settings(),
        );

        let response = service
            .create_short_link("https://example.com".to_string(), false, None)
            .await
            .unwrap();

        assert_eq!(response.code, "fresh2");
    }

    #[tokio::test]
    async fn test_collision_keeps_stale_lock_and_retries() {
        let mut store = MockLinkStore::new();
        let mut lock = MockDistributedLock::new();

        lock.expect_try_acquire().times(2).returning(|_, _| Ok(true));
        // Only the winning candidate's lock is released; the stale one
        // self-expires via TTL.
        lock.expect_release()
            .with(eq("shortLinkCodeLock:winner"))
            .times(1)
            .returning(|_| Ok(true));

        store
            .expect_code_exists()
            .with(eq("occupied"))
            .times(1)
            .returning(|_| Ok(true));
        store
            .expect_code_exists()
            .with(eq("winner"))
            .times(1)
            .returning(|_| Ok(false));
        store.expect_create().times(1).returning(|_| Ok(()));
        store.expect_commit().times(1).returning(|| Ok(()));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(permissive_cache()),
            Arc::new(lock),
            Arc::new(fixed_generator(vec!["occupied", "winner"])),
            settings(),
        );

        let response = service
            .create_short_link("https://example.com".to_string(), false, None)
            .await
            .unwrap();

        assert_eq!(response.code, "winner");
    }

    #[tokio::test]
    async fn test_allocation_ceiling_surfaces_failure() {
        let mut store = MockLinkStore::new();
        let mut lock = MockDistributedLock::new();
        let mut generator = MockCodeGenerator::new();

        generator.expect_generate().returning(|| "stuck".to_string());
        lock.expect_try_acquire().times(4).returning(|_, _| Ok(true));
        store.expect_code_exists().times(4).returning(|_| Ok(true));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(permissive_cache()),
            Arc::new(lock),
            Arc::new(generator),
            settings(),
        );

        let result = service
            .create_short_link("https://example.com".to_string(), false, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_lock_error_propagates() {
        let store = MockLinkStore::new();
        let mut lock = MockDistributedLock::new();

        lock.expect_try_acquire().times(1).returning(|_, _| {
            Err(crate::infrastructure::lock::LockError::ConnectionError(
                "down".to_string(),
            ))
        });

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(permissive_cache()),
            Arc::new(lock),
            Arc::new(fixed_generator(vec!["abc123"])),
            settings(),
        );

        let result = service
            .create_short_link("https://example.com".to_string(), false, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_url() {
        let service = ShortLinkService::new(
            Arc::new(MockLinkStore::new()),
            Arc::new(MockCacheService::new()),
            Arc::new(MockDistributedLock::new()),
            Arc::new(MockCodeGenerator::new()),
            settings(),
        );

        let result = service
            .create_short_link("not-a-url".to_string(), false, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_rejects_expiring_without_deadline() {
        let service = ShortLinkService::new(
            Arc::new(MockLinkStore::new()),
            Arc::new(MockCacheService::new()),
            Arc::new(MockDistributedLock::new()),
            Arc::new(MockCodeGenerator::new()),
            settings(),
        );

        let result = service
            .create_short_link("https://example.com".to_string(), true, None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_resolve_cache_hit_skips_store() {
        let mut store = MockLinkStore::new();
        let mut cache = MockCacheService::new();

        store.expect_get_original_url().times(0);
        cache
            .expect_get_url()
            .with(eq("shortlink:abc123"))
            .times(1)
            .returning(|_| Ok(Some("https://example.com/x".to_string())));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(cache),
            Arc::new(MockDistributedLock::new()),
            Arc::new(MockCodeGenerator::new()),
            settings(),
        );

        let response = service.get_original_url("abc123").await.unwrap();

        assert!(response.found);
        assert_eq!(response.original_url, "https://example.com/x");
    }

    #[tokio::test]
    async fn test_resolve_cached_negative_sentinel() {
        let mut store = MockLinkStore::new();
        let mut cache = MockCacheService::new();

        store.expect_get_original_url().times(0);
        cache
            .expect_get_url()
            .times(1)
            .returning(|_| Ok(Some(String::new())));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(cache),
            Arc::new(MockDistributedLock::new()),
            Arc::new(MockCodeGenerator::new()),
            settings(),
        );

        let response = service.get_original_url("ghost").await.unwrap();

        assert!(!response.found);
        assert!(response.original_url.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_miss_populates_cache() {
        let mut store = MockLinkStore::new();
        let mut cache = MockCacheService::new();

        cache.expect_get_url().times(1).returning(|_| Ok(None));
        store
            .expect_get_original_url()
            .with(eq("abc123"))
            .times(1)
            .returning(|_| Ok(Some("https://example.com/x".to_string())));
        cache
            .expect_set_url()
            .with(
                eq("shortlink:abc123"),
                eq("https://example.com/x"),
                eq(None::<usize>),
            )
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(cache),
            Arc::new(MockDistributedLock::new()),
            Arc::new(MockCodeGenerator::new()),
            settings(),
        );

        let response = service.get_original_url("abc123").await.unwrap();
        assert!(response.found);
    }

    #[tokio::test]
    async fn test_resolve_miss_caches_negative_sentinel() {
        let mut store = MockLinkStore::new();
        let mut cache = MockCacheService::new();

        cache.expect_get_url().times(1).returning(|_| Ok(None));
        store
            .expect_get_original_url()
            .times(1)
            .returning(|_| Ok(None));
        // Not-found is written back as "" to absorb repeat lookups.
        cache
            .expect_set_url()
            .with(eq("shortlink:ghost"), eq(""), eq(None::<usize>))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(cache),
            Arc::new(MockDistributedLock::new()),
            Arc::new(MockCodeGenerator::new()),
            settings(),
        );

        let response = service.get_original_url("ghost").await.unwrap();
        assert!(!response.found);
    }

    #[tokio::test]
    async fn test_resolve_cache_error_falls_back_to_store() {
        let mut store = MockLinkStore::new();
        let mut cache = MockCacheService::new();

        cache.expect_get_url().times(1).returning(|_| {
            Err(crate::infrastructure::cache::CacheError::OperationError(
                "down".to_string(),
            ))
        });
        store
            .expect_get_original_url()
            .times(1)
            .returning(|_| Ok(Some("https://example.com".to_string())));
        cache.expect_set_url().returning(|_, _, _| Ok(()));

        let service = ShortLinkService::new(
            Arc::new(store),
            Arc::new(cache),
            Arc::new(MockDistributedLock::new()),
            Arc::new(MockCodeGenerator::new()),
            settings(),
        );

        let response = service.get_original_url("abc123").await.unwrap();
        assert!(response.found);
    }
}
