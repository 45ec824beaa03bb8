//! Handler for short link redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, header},
    response::Redirect,
};
use chrono::Utc;
use serde_json::json;
use std::net::SocketAddr;
use tracing::warn;

use crate::domain::access_event::AccessEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Resolve the code through the cache-aside resolver
/// 2. Publish an access event for async analytics (fire-and-forget)
/// 3. Return 307 Temporary Redirect
///
/// The publish neither blocks the redirect nor fails it: analytics
/// durability is the consumer's concern, and the response has already been
/// decided by the time the event is processed.
///
/// # Errors
///
/// Returns 404 Not Found if the code is unknown or expired.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Redirect, AppError> {
    let resolved = state.shortener.get_original_url(&code).await?;

    if !resolved.found {
        return Err(AppError::not_found(
            "Short link not found",
            json!({ "code": code }),
        ));
    }

    let event = AccessEvent::new(
        code,
        Some(addr.ip().to_string()),
        headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok()),
        Utc::now(),
    );

    if let Err(e) = state.event_bus.publish(event, None).await {
        warn!(error = %e, "failed to publish access event");
    }

    Ok(Redirect::temporary(&resolved.original_url))
}
