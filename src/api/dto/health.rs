//! DTO for the health endpoint.

use serde::Serialize;

/// Health check response reporting backend reachability.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub cache: bool,
}
