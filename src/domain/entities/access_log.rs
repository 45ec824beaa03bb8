//! Access log entity recording one observed access to a code.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// An immutable record of a single access to a short link.
///
/// `link_id` is a weak reference by id only; an entry may outlive the link
/// it points to. It is a historical fact, not a live join, and is never
/// mutated or deleted by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessLog {
    pub id: Uuid,
    pub link_id: Uuid,
    pub code: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    /// When the client hit the redirect, as observed by the producer.
    pub accessed_at: DateTime<Utc>,
    /// When the consumer persisted this entry.
    pub created_at: DateTime<Utc>,
}

impl AccessLog {
    /// Creates a new access log entry for the given link.
    pub fn create(
        link_id: Uuid,
        code: String,
        ip_address: Option<String>,
        user_agent: Option<String>,
        accessed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            link_id,
            code,
            ip_address,
            user_agent,
            accessed_at,
            created_at: Utc::now(),
        }
    }
}
