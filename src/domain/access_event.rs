//! Access event published after a successful resolution.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message carrying one observed access, produced on the redirect hot path
/// and consumed asynchronously by the analytics worker.
///
/// Delivery is at-least-once: the consumer must tolerate redelivery, and an
/// event referencing a code that no longer resolves is discarded, not failed.
/// Serializable so broker-backed transports can carry it unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
    pub code: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

impl AccessEvent {
    /// Creates a new access event.
    pub fn new(
        code: String,
        ip_address: Option<String>,
        user_agent: Option<&str>,
        accessed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            code,
            ip_address,
            user_agent: user_agent.map(|s| s.to_string()),
            accessed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let at = Utc::now();
        let event = AccessEvent::new(
            "abc123".to_string(),
            Some("10.0.0.1".to_string()),
            Some("Mozilla/5.0"),
            at,
        );

        assert_eq!(event.code, "abc123");
        assert_eq!(event.ip_address, Some("10.0.0.1".to_string()));
        assert_eq!(event.user_agent, Some("Mozilla/5.0".to_string()));
        assert_eq!(event.accessed_at, at);
    }

    #[test]
    fn test_event_creation_minimal() {
        let event = AccessEvent::new("xyz".to_string(), None, None, Utc::now());

        assert!(event.ip_address.is_none());
        assert!(event.user_agent.is_none());
    }
}
