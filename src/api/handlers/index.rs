//! Liveness banner served at the root path.

/// `GET /`
pub async fn index_handler() -> &'static str {
    "URL Shortener API is running..."
}
