//! Background consumer persisting access events.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, error};

use super::bus::Envelope;
use crate::application::services::AnalyticsService;
use crate::domain::repositories::{AccessLogStore, LinkStore};

/// Message-level retry policy for event processing.
///
/// Attempts are spaced at a fixed interval. After `max_attempts` total tries
/// the event is dead-lettered: logged with its payload and never retried
/// again. The original requester is long gone by then, so nothing propagates
/// back.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            interval: Duration::from_millis(500),
        }
    }
}

/// Drains the access-event queue until the sending side closes.
///
/// Each event is handed to [`AnalyticsService::track_access`]:
///
/// - `Ok(true)`: the access log entry was persisted and the record's
///   attempt counter incremented
/// - `Ok(false)`: the code no longer resolves to a record; the event is
///   discarded silently (the access is simply not attributable)
/// - `Err(_)`: transient failure; retried per `retry`, then dead-lettered
///
/// Spawn one instance at startup; it exits when every publisher is dropped.
pub async fn run_access_worker<S, A>(
    mut rx: mpsc::Receiver<Envelope>,
    analytics: Arc<AnalyticsService<S, A>>,
    retry: RetryPolicy,
) where
    S: LinkStore + 'static,
    A: AccessLogStore + 'static,
{
    while let Some(envelope) = rx.recv().await {
        let strategy = FixedInterval::new(retry.interval).take(retry.max_attempts.saturating_sub(1));

        let event = &envelope.event;
        let result = Retry::spawn(strategy, || {
            analytics.track_access(
                &event.code,
                event.ip_address.clone(),
                event.user_agent.clone(),
                event.accessed_at,
            )
        })
        .await;

        match result {
            Ok(true) => {
                debug!(code = %event.code, "access event persisted");
            }
            Ok(false) => {
                debug!(code = %event.code, "access event discarded; code no longer resolves");
            }
            Err(e) => {
                error!(
                    code = %event.code,
                    accessed_at = %event.accessed_at,
                    attempts = retry.max_attempts,
                    error = %e,
                    "access event dead-lettered after exhausted retries"
                );
            }
        }
    }

    debug!("access worker stopped; event bus closed");
}
