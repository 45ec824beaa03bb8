//! Health check handler.

use axum::{Json, extract::State};

use crate::api::dto::health::HealthResponse;
use crate::state::AppState;

/// Reports service health.
///
/// # Endpoint
///
/// `GET /health`
///
/// Probes the database with a trivial query and the cache with its own
/// health check. A degraded cache does not degrade the service status,
/// since resolution falls back to the store.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(state.db.as_ref())
        .await
        .is_ok();

    let cache = state.cache.health_check().await;

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" },
        database,
        cache,
    })
}
