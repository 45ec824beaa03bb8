//! Shared application state injected into all handlers.

use sqlx::PgPool;
use std::sync::Arc;

use crate::application::services::{AnalyticsService, ShortLinkService};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::messaging::EventBus;
use crate::infrastructure::persistence::{PgAccessLogStore, PgLinkStore};

/// Application state shared across requests.
///
/// Services are wired over the PostgreSQL stores at startup; the cache,
/// lock, and event bus behind them are chosen by configuration.
#[derive(Clone)]
pub struct AppState {
    pub shortener: Arc<ShortLinkService<PgLinkStore>>,
    pub analytics: Arc<AnalyticsService<PgLinkStore, PgAccessLogStore>>,
    pub event_bus: Arc<dyn EventBus>,
    pub cache: Arc<dyn CacheService>,
    pub db: Arc<PgPool>,
}
