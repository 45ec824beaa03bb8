//! DTOs for the link creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    #[validate(length(max = 2048, message = "URL is too long"))]
    pub url: String,

    /// When true, the link stops resolving at `expires_at`.
    #[serde(default)]
    pub is_expiring: bool,

    /// Expiry timestamp; required when `is_expiring` is set.
    pub expires_at: Option<DateTime<Utc>>,
}

/// Response for a created link.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub short_url: String,
    pub code: String,
    pub success: bool,
}
