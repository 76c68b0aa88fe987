//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`                      - Liveness banner
//! - `GET  /health`                - Health check: database, click queue
//! - `POST /api/shorten`, `/shorten`                - Create a short link (rate limited)
//! - `GET  /api/analytics/{code}`, `/analytics/{code}` - Link analytics
//! - `GET  /{code}`, `/api/{code}` - Short link redirect
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Rate limiting** - Per-IP token bucket on link creation only
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, index_handler};
use crate::api::middleware::{rate_limit, tracing};
use crate::config::RateLimitConfig;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware, without path
/// normalization.
///
/// Both mounts of the create endpoint share one limiter, so a client cannot
/// double its budget by alternating paths.
///
/// # Errors
///
/// Fails if the rate limit settings are zero.
pub fn router(state: AppState, rate_limit: RateLimitConfig) -> anyhow::Result<Router> {
    let shorten = api::routes::shorten_routes()
        .layer(rate_limit::layer(rate_limit.burst, rate_limit.period())?)
        .layer(middleware::map_response(rate_limit::rejection_envelope));

    let api_router = api::routes::public_routes().merge(shorten.clone());

    let router = Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .nest("/api", api_router)
        .merge(shorten)
        .merge(api::routes::public_routes())
        .with_state(state)
        .layer(tracing::layer());

    Ok(router)
}

/// Constructs the application router with trailing slashes trimmed before
/// routing.
///
/// # Errors
///
/// Fails if the rate limit settings are zero.
pub fn app_router(
    state: AppState,
    rate_limit: RateLimitConfig,
) -> anyhow::Result<NormalizePath<Router>> {
    Ok(NormalizePathLayer::trim_trailing_slash().layer(router(state, rate_limit)?))
}
