//! Short link entity representing one code → URL mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shortened URL mapping.
///
/// The `code` is globally unique among all records for the lifetime of the
/// system: codes are never reused, even after logical expiry. Expiry is a
/// derived predicate, not persisted state: an expired record stays in storage
/// and keeps its code reserved, it just stops resolving.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortLink {
    pub id: Uuid,
    pub long_url: String,
    /// Derived at creation as `base_url + "/" + code`.
    pub short_url: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub is_expiring: bool,
    /// Meaningful only when `is_expiring` is set.
    pub expires_at: Option<DateTime<Utc>>,
    /// Incremented by the tracking path; never touched by allocation or
    /// resolution.
    pub attempt_count: i64,
}

impl ShortLink {
    /// Creates a new short link with a fresh id and creation timestamp.
    pub fn create(
        long_url: String,
        short_url: String,
        code: String,
        is_expiring: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            long_url,
            short_url,
            code,
            created_at: Utc::now(),
            is_expiring,
            expires_at,
            attempt_count: 0,
        }
    }

    /// Returns true if the link has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expiring && self.expires_at.is_some_and(|e| Utc::now() >= e)
    }

    /// Records one access attempt.
    pub fn increment_attempt_count(&mut self) {
        self.attempt_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn make_link(is_expiring: bool, expires_at: Option<DateTime<Utc>>) -> ShortLink {
        ShortLink::create(
            "https://example.com/page".to_string(),
            "http://localhost:3000/abc123".to_string(),
            "abc123".to_string(),
            is_expiring,
            expires_at,
        )
    }

    #[test]
    fn test_create_assigns_id_and_timestamp() {
        let link = make_link(false, None);

        assert!(!link.id.is_nil());
        assert_eq!(link.code, "abc123");
        assert_eq!(link.short_url, "http://localhost:3000/abc123");
        assert_eq!(link.attempt_count, 0);
        assert!(link.created_at <= Utc::now());
    }

    #[test]
    fn test_create_assigns_distinct_ids() {
        let a = make_link(false, None);
        let b = make_link(false, None);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_not_expired_without_flag() {
        // A past expires_at alone does not expire the link; the flag gates it.
        let link = make_link(false, Some(Utc::now() - Duration::hours(1)));
        assert!(!link.is_expired());
    }

    #[test]
    fn test_expired_when_past_deadline() {
        let link = make_link(true, Some(Utc::now() - Duration::seconds(1)));
        assert!(link.is_expired());
    }

    #[test]
    fn test_not_expired_before_deadline() {
        let link = make_link(true, Some(Utc::now() + Duration::days(7)));
        assert!(!link.is_expired());
    }

    #[test]
    fn test_expiring_without_deadline_never_expires() {
        let link = make_link(true, None);
        assert!(!link.is_expired());
    }

    #[test]
    fn test_increment_attempt_count() {
        let mut link = make_link(false, None);
        link.increment_attempt_count();
        link.increment_attempt_count();
        assert_eq!(link.attempt_count, 2);
    }
}
