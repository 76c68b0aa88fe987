//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_ip;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}` (also mounted at `/api/{code}`)
///
/// # Request Flow
///
/// 1. Look up the code and reject unknown or expired links
/// 2. Build the `Location` value, percent-encoding bytes a header cannot carry
/// 3. Queue a click job for the background worker (dropped if the queue is full)
/// 4. Return `302 Found`
///
/// Click recording never delays or fails the redirect.
///
/// # Errors
///
/// Returns 404 with `URL not found` or `URL expired`.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Response, AppError> {
    let ip_address = client_ip(&headers, Some(addr), state.behind_proxy);

    let location = state.redirect_service.resolve(&code, ip_address).await?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
