//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, cache and lock setup, worker spawning, and
//! Axum server lifecycle.

use crate::application::services::{
    AnalyticsService, ShortLinkService, ShortLinkSettings,
};
use crate::config::Config;
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::lock::{DistributedLock, MemoryLock, RedisLock};
use crate::infrastructure::messaging::{ChannelEventBus, RetryPolicy, run_access_worker};
use crate::infrastructure::persistence::{PgAccessLogStore, PgLinkStore};
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::RandomCodeGenerator;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations
/// - Redis cache and lock coordinator (or in-process fallbacks)
/// - Access-event bus and background worker
/// - Axum HTTP server
///
/// The in-process fallbacks are only correct for a single service instance;
/// multi-instance deployments must configure Redis so allocation locks are
/// visible across processes.
///
/// # Errors
///
/// Returns an error if the database connection, bind, or serve fails.
pub async fn run(config: Config) -> Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(&config.database_url)
        .await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    let cache: Arc<dyn CacheService> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    let lock: Arc<dyn DistributedLock> = if let Some(redis_url) = &config.redis_url {
        let redis_lock = RedisLock::connect(redis_url).await?;
        tracing::info!("Lock coordinator enabled (Redis)");
        Arc::new(redis_lock)
    } else {
        tracing::warn!("Lock coordinator is in-process; not safe for multiple instances");
        Arc::new(MemoryLock::new())
    };

    let pool = Arc::new(pool);
    let link_store = Arc::new(PgLinkStore::new(pool.clone()));
    let access_log_store = Arc::new(PgAccessLogStore::new(pool.clone()));

    let shortener = Arc::new(ShortLinkService::new(
        link_store.clone(),
        cache.clone(),
        lock,
        Arc::new(RandomCodeGenerator),
        ShortLinkSettings {
            base_url: config.base_url.clone(),
            code_lock_ttl: Duration::from_secs(config.code_lock_ttl_seconds),
            max_allocation_attempts: config.max_allocation_attempts,
        },
    ));

    let analytics = Arc::new(AnalyticsService::new(link_store, access_log_store));

    let (event_bus, event_rx) = ChannelEventBus::new(config.access_queue_capacity);
    tokio::spawn(run_access_worker(
        event_rx,
        analytics.clone(),
        RetryPolicy {
            max_attempts: config.event_retry_attempts,
            interval: Duration::from_millis(config.event_retry_interval_ms),
        },
    ));
    tracing::info!("Access worker started");

    let state = AppState {
        shortener,
        analytics,
        event_bus: Arc::new(event_bus),
        cache,
        db: pool,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .await?;

    Ok(())
}
