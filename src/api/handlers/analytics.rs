//! Handler for per-link analytics.

use axum::extract::{Path, State};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::api::dto::envelope::ApiResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns click analytics for a short code.
///
/// # Endpoint
///
/// `GET /api/analytics/{code}` (also mounted at `/analytics/{code}`)
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Success",
///   "data": {
///     "original_url": "https://example.com",
///     "short_code": "abc1234",
///     "created_at": "2025-01-01T00:00:00Z",
///     "expires_at": null,
///     "click_count": 3,
///     "recent_clicks": [
///       { "clicked_at": "2025-01-01T00:05:00Z", "ip_address": "8.8.8.8", "country": "US" }
///     ],
///     "geography": { "US": 2, "Unknown": 1 }
///   }
/// }
/// ```
///
/// Reading analytics does not record a click.
///
/// # Errors
///
/// Returns 404 with `URL not found` or `URL expired`.
pub async fn analytics_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<ApiResponse<AnalyticsResponse>, AppError> {
    let report = state.analytics_service.get_analytics(&code).await?;

    Ok(ApiResponse::success(AnalyticsResponse::from(report)))
}
