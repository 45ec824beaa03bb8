//! API route definitions.

use axum::Router;
use axum::routing::post;

use crate::api::handlers::create_link_handler;
use crate::state::AppState;

/// Routes nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/links", post(create_link_handler))
}
