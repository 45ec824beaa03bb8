//! Asynchronous access-event delivery.

pub mod access_worker;
pub mod bus;
pub mod channel_bus;

pub use access_worker::{RetryPolicy, run_access_worker};
pub use bus::{BusError, BusResult, Envelope, EventBus, Headers};
pub use channel_bus::ChannelEventBus;
