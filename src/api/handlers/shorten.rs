//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::json;

use crate::api::dto::envelope::ApiResponse;
use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for one long URL.
///
/// # Endpoint
///
/// `POST /api/shorten` (also mounted at `/shorten`)
///
/// # Request Body
///
/// ```json
/// {
///   "original_url": "https://example.com/some/long/path",
///   "expiresIn": 24,
///   "alias": "my-link"
/// }
/// ```
///
/// `expiresIn` (hours) and `alias` are optional.
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "message": "Success",
///   "data": { "short_url": "http://localhost:3000/my-link" }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 for a malformed body, a missing URL, an invalid or reserved
/// alias, a non-positive `expiresIn`, or an alias that is already taken.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<ApiResponse<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(invalid_body)?;

    let link = state
        .link_service
        .create_short_link(payload.original_url, payload.alias, payload.expires_in)
        .await?;

    Ok(ApiResponse::success(ShortenResponse {
        short_url: state.link_service.short_url(&link.short_code),
    }))
}

fn invalid_body(rejection: JsonRejection) -> AppError {
    AppError::bad_request(
        "Invalid request body",
        json!({ "reason": rejection.body_text() }),
    )
}
