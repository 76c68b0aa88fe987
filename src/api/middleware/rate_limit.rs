//! Per-client rate limiting for link creation.

use anyhow::Context;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

use crate::api::dto::envelope::ApiResponse;

pub const RATE_LIMIT_MESSAGE: &str = "Too many requests, please try again later.";

/// Headers from the limiter's rejection that survive the rewrite.
const FORWARDED_HEADERS: [&str; 3] = ["retry-after", "x-ratelimit-after", "x-ratelimit-limit"];

pub type RateLimitLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a token-bucket limiter keyed by client IP.
///
/// # Limits
///
/// - **Burst**: `burst` requests
/// - **Replenish**: one request every `period`
///
/// The key is read from `X-Forwarded-For`, `X-Real-IP` or `Forwarded`
/// before falling back to the peer address.
///
/// # Errors
///
/// Fails if `burst` or `period` is zero.
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/shorten", post(shorten_handler))
///     .layer(rate_limit::layer(100, Duration::from_millis(9000))?)
///     .layer(middleware::map_response(rate_limit::rejection_envelope));
/// ```
pub fn layer(burst: u32, period: Duration) -> anyhow::Result<RateLimitLayer> {
    let governor_conf = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .period(period)
        .burst_size(burst)
        .finish()
        .context("rate limit burst and period must be greater than zero")?;

    Ok(GovernorLayer::new(Arc::new(governor_conf)))
}

/// Rewrites the limiter's plain-text `429` into the JSON envelope.
///
/// Any other response passes through untouched.
pub async fn rejection_envelope(response: Response) -> Response {
    if response.status() != StatusCode::TOO_MANY_REQUESTS {
        return response;
    }

    let (parts, _) = response.into_parts();
    let mut rewritten = (
        StatusCode::TOO_MANY_REQUESTS,
        ApiResponse::<()>::failure(RATE_LIMIT_MESSAGE, None),
    )
        .into_response();

    for name in FORWARDED_HEADERS {
        if let Some(value) = parts.headers.get(name) {
            rewritten.headers_mut().insert(name, value.clone());
        }
    }

    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::HeaderValue;

    #[test]
    fn test_zero_burst_is_rejected() {
        assert!(layer(0, Duration::from_secs(1)).is_err());
        assert!(layer(10, Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_rejection_is_rewritten() {
        let mut original = (StatusCode::TOO_MANY_REQUESTS, "Too Many Requests! Wait for 9s")
            .into_response();
        original
            .headers_mut()
            .insert("retry-after", HeaderValue::from_static("9"));

        let response = rejection_envelope(original).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers()["retry-after"], "9");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], RATE_LIMIT_MESSAGE);
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let response = rejection_envelope((StatusCode::OK, "fine").into_response()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"fine");
    }
}
