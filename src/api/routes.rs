//! API route configuration.

use crate::api::handlers::{analytics_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Link creation, kept separate so it can carry its own rate limiter.
///
/// - `POST /shorten` - Create a short link
pub fn shorten_routes() -> Router<AppState> {
    Router::new().route("/shorten", post(shorten_handler))
}

/// Read-only routes.
///
/// - `GET /analytics/{code}` - Click analytics for a link
/// - `GET /{code}`           - Redirect to the original URL
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/{code}", get(analytics_handler))
        .route("/{code}", get(redirect_handler))
}
