//! Bounded-channel transport for access events.

use super::bus::{BusError, BusResult, Envelope, EventBus, Headers};
use crate::domain::access_event::AccessEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::warn;

/// In-process event bus over a bounded `mpsc` channel.
///
/// `publish` never waits: when the queue is full the event is dropped with a
/// warning rather than stalling the redirect path. Analytics loss under
/// sustained overload is the accepted trade; a broker-backed transport is the
/// answer when it is not.
pub struct ChannelEventBus {
    tx: mpsc::Sender<Envelope>,
}

impl ChannelEventBus {
    /// Creates a bus and its receiving end with the given queue capacity.
    ///
    /// The receiver is handed to
    /// [`super::run_access_worker`] spawned at startup.
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventBus for ChannelEventBus {
    async fn publish(&self, event: AccessEvent, headers: Option<Headers>) -> BusResult<()> {
        match self.tx.try_send(Envelope { event, headers }) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(envelope)) => {
                warn!(
                    code = %envelope.event.code,
                    "access-event queue full; dropping event"
                );
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => Err(BusError::Closed),
        }
    }
}
