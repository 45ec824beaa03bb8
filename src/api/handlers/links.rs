//! Handler for link creation.

use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::links::{CreateLinkRequest, CreateLinkResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link.
///
/// # Endpoint
///
/// `POST /api/links`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/very/long/path",
///   "is_expiring": false
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the derived short URL and its code.
///
/// # Errors
///
/// Returns 400 Bad Request for a malformed URL or an expiring link without a
/// deadline. Returns 500 if the code space is exhausted under contention.
pub async fn create_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<CreateLinkResponse>), AppError> {
    payload.validate()?;

    let created = state
        .shortener
        .create_short_link(payload.url, payload.is_expiring, payload.expires_at)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLinkResponse {
            short_url: created.short_url,
            code: created.code,
            success: created.success,
        }),
    ))
}
