//! Event bus trait and message envelope.

use crate::domain::access_event::AccessEvent;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// Per-message metadata carried alongside the event.
pub type Headers = HashMap<String, String>;

/// An access event with its delivery headers.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub event: AccessEvent,
    pub headers: Option<Headers>,
}

/// Errors that can occur when publishing.
#[derive(Debug)]
pub enum BusError {
    /// The transport is no longer accepting messages (consumer gone).
    Closed,
    OperationError(String),
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "Event bus is closed"),
            Self::OperationError(e) => write!(f, "Event bus error: {}", e),
        }
    }
}

impl std::error::Error for BusError {}

/// Result type for bus operations.
pub type BusResult<T> = Result<T, BusError>;

/// Publish side of the access-event pipeline.
///
/// Publishing must not block on, nor depend on the outcome of, consumption:
/// the redirect has already been served by the time the event is processed.
/// Delivery is at-least-once; consumers tolerate duplicates.
///
/// # Implementations
///
/// - [`crate::infrastructure::messaging::ChannelEventBus`] - bounded
///   in-process channel drained by [`super::run_access_worker`]
///
/// Broker-backed transports (with durable queues and real dead-letter
/// routing) slot in behind this same trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publishes one access event with optional headers.
    async fn publish(&self, event: AccessEvent, headers: Option<Headers>) -> BusResult<()>;
}
