#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use shortlink::application::services::ShortLinkSettings;
use shortlink::domain::entities::ShortLink;
use shortlink::domain::repositories::LinkStore;
use shortlink::error::AppError;
use shortlink::infrastructure::lock::{DistributedLock, LockResult};
use shortlink::infrastructure::persistence::MemoryAccessLogStore;
use shortlink::utils::code_generator::{CodeGenerator, generate_code};

pub const BASE_URL: &str = "https://sho.rt";

pub fn settings(max_allocation_attempts: usize) -> ShortLinkSettings {
    ShortLinkSettings {
        base_url: BASE_URL.to_string(),
        code_lock_ttl: Duration::from_secs(600),
        max_allocation_attempts,
    }
}

/// Generator that yields scripted candidates first, then falls back to the
/// production recipe. Lets tests force candidate collisions between racers.
pub struct ScriptedGenerator {
    scripted: Mutex<VecDeque<String>>,
}

impl ScriptedGenerator {
    pub fn new(scripted: &[&str]) -> Self {
        Self {
            scripted: Mutex::new(scripted.iter().map(|s| s.to_string()).collect()),
        }
    }
}

impl CodeGenerator for ScriptedGenerator {
    fn generate(&self) -> String {
        self.scripted
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(generate_code)
    }
}

/// Generator that always returns the same candidate.
pub struct FixedGenerator(pub &'static str);

impl CodeGenerator for FixedGenerator {
    fn generate(&self) -> String {
        self.0.to_string()
    }
}

/// Lock coordinator that refuses every acquisition.
pub struct RefusingLock;

#[async_trait]
impl DistributedLock for RefusingLock {
    async fn try_acquire(&self, _key: &str, _ttl: Duration) -> LockResult<bool> {
        Ok(false)
    }

    async fn release(&self, _key: &str) -> LockResult<bool> {
        Ok(true)
    }
}

/// Link store wrapper counting calls per operation.
pub struct CountingLinkStore<S> {
    inner: S,
    pub resolve_calls: AtomicUsize,
    pub exists_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
}

impl<S> CountingLinkStore<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            resolve_calls: AtomicUsize::new(0),
            exists_calls: AtomicUsize::new(0),
            create_calls: AtomicUsize::new(0),
        }
    }

    pub fn resolve_count(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    pub fn exists_count(&self) -> usize {
        self.exists_calls.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<S: LinkStore> LinkStore for CountingLinkStore<S> {
    async fn create(&self, link: &ShortLink) -> Result<(), AppError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.create(link).await
    }

    async fn update(&self, link: &ShortLink) -> Result<(), AppError> {
        self.inner.update(link).await
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        self.exists_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.code_exists(code).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        self.inner.find_by_code(code).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn get_original_url(&self, code: &str) -> Result<Option<String>, AppError> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.get_original_url(code).await
    }

    async fn commit(&self) -> Result<(), AppError> {
        self.inner.commit().await
    }
}

/// Link store wrapper that fails `find_by_code` a fixed number of times
/// before delegating, for exercising consumer retry.
pub struct FlakyLinkStore<S> {
    inner: S,
    failures_remaining: AtomicUsize,
}

impl<S> FlakyLinkStore<S> {
    pub fn new(inner: S, failures: usize) -> Self {
        Self {
            inner,
            failures_remaining: AtomicUsize::new(failures),
        }
    }

    fn should_fail(&self) -> bool {
        self.failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl<S: LinkStore> LinkStore for FlakyLinkStore<S> {
    async fn create(&self, link: &ShortLink) -> Result<(), AppError> {
        self.inner.create(link).await
    }

    async fn update(&self, link: &ShortLink) -> Result<(), AppError> {
        self.inner.update(link).await
    }

    async fn code_exists(&self, code: &str) -> Result<bool, AppError> {
        self.inner.code_exists(code).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        if self.should_fail() {
            return Err(AppError::internal(
                "Database error",
                serde_json::json!({ "injected": true }),
            ));
        }
        self.inner.find_by_code(code).await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        self.inner.find_by_id(id).await
    }

    async fn get_original_url(&self, code: &str) -> Result<Option<String>, AppError> {
        self.inner.get_original_url(code).await
    }

    async fn commit(&self) -> Result<(), AppError> {
        self.inner.commit().await
    }
}

/// Polls the log store until it holds `expected` entries or `timeout` elapses.
pub async fn wait_for_log_count(
    store: &MemoryAccessLogStore,
    expected: usize,
    timeout: Duration,
) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;

    while tokio::time::Instant::now() < deadline {
        if store.len().await == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    false
}
