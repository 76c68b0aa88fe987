//! DTOs for the link shortening endpoint.

use serde::{Deserialize, Serialize};

/// Request to shorten one URL.
///
/// Every field is optional at the serde level so a missing `original_url`
/// surfaces as a validation message rather than a decoding error.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub original_url: Option<String>,

    /// Lifetime in hours.
    #[serde(rename = "expiresIn")]
    pub expires_in: Option<f64>,

    /// Custom short code (max 20 chars of `[A-Za-z0-9_-]`).
    pub alias: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_field_names() {
        let req: ShortenRequest = serde_json::from_value(json!({
            "original_url": "https://example.com",
            "expiresIn": 1,
            "alias": "x"
        }))
        .unwrap();

        assert_eq!(req.original_url.as_deref(), Some("https://example.com"));
        assert_eq!(req.expires_in, Some(1.0));
        assert_eq!(req.alias.as_deref(), Some("x"));
    }

    #[test]
    fn test_request_empty_object() {
        let req: ShortenRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.original_url.is_none());
        assert!(req.expires_in.is_none());
        assert!(req.alias.is_none());
    }
}
