//! Access tracking and analytics persistence.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entities::AccessLog;
use crate::domain::repositories::{AccessLogStore, LinkStore};
use crate::error::AppError;

/// Service persisting access analytics, driven by the event consumer.
///
/// A missing code is an expected outcome here, not a fault: the link may
/// have been created and observed on another instance, expired, or never
/// existed. Both operations report it as `Ok(false)` and write nothing.
pub struct AnalyticsService<S: LinkStore, A: AccessLogStore> {
    links: Arc<S>,
    access_logs: Arc<A>,
}

impl<S: LinkStore, A: AccessLogStore> AnalyticsService<S, A> {
    /// Creates a new analytics service.
    pub fn new(links: Arc<S>, access_logs: Arc<A>) -> Self {
        Self { links, access_logs }
    }

    /// Records one access: appends an access log entry and increments the
    /// record's attempt counter.
    ///
    /// Returns `Ok(false)` without writing anything when the code resolves
    /// to no record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage failures; the event
    /// transport retries these.
    pub async fn track_access(
        &self,
        code: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
        accessed_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let Some(mut link) = self.links.find_by_code(code).await? else {
            return Ok(false);
        };

        link.increment_attempt_count();
        self.links.update(&link).await?;

        let entry = AccessLog::create(
            link.id,
            code.to_string(),
            ip_address,
            user_agent,
            accessed_at,
        );
        self.access_logs.create(&entry).await?;

        self.links.commit().await?;
        self.access_logs.commit().await?;

        Ok(true)
    }

    /// Records one access log entry without touching the attempt counter.
    ///
    /// Returns `Ok(false)` without writing anything when the code resolves
    /// to no record.
    pub async fn record_access_log(
        &self,
        code: &str,
        ip_address: Option<String>,
        user_agent: Option<String>,
        accessed_at: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let Some(link) = self.links.find_by_code(code).await? else {
            return Ok(false);
        };

        let entry = AccessLog::create(
            link.id,
            code.to_string(),
            ip_address,
            user_agent,
            accessed_at,
        );
        self.access_logs.create(&entry).await?;
        self.access_logs.commit().await?;

        Ok(true)
    }
}
