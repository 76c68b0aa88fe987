//! Handler for health check endpoint.

use axum::{extract::State, http::StatusCode};

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Service is healthy",
///   "data": {
///     "status": "healthy",
///     "version": "0.1.0",
///     "checks": {
///       "database": { "status": "ok", "message": "Connected" },
///       "click_queue": { "status": "ok", "message": "Capacity: 10000" }
///     }
///   }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, ApiResponse<HealthResponse>) {
    let db_check = check_database(&state).await;
    let queue_check = check_click_queue(&state);

    let all_healthy = db_check.is_ok() && queue_check.is_ok();

    let health = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            database: db_check,
            click_queue: queue_check,
        },
    };

    if all_healthy {
        (
            StatusCode::OK,
            ApiResponse::success_with_message(health, "Service is healthy"),
        )
    } else {
        let mut body = ApiResponse::success_with_message(health, "Service is degraded");
        body.success = false;
        (StatusCode::SERVICE_UNAVAILABLE, body)
    }
}

async fn check_database(state: &AppState) -> CheckStatus {
    match state.link_service.check_store().await {
        Ok(()) => CheckStatus::ok("Connected"),
        Err(e) => CheckStatus::error(format!("Database error: {}", e)),
    }
}

fn check_click_queue(state: &AppState) -> CheckStatus {
    if state.redirect_service.is_queue_open() {
        CheckStatus::ok(format!(
            "Capacity: {}",
            state.redirect_service.queue_capacity()
        ))
    } else {
        CheckStatus::error("Click queue is closed")
    }
}
