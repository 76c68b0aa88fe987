//! Click job handed from the redirect path to the background worker.

/// An in-memory click awaiting persistence.
///
/// Created by the redirect resolver after a successful lookup and sent over
/// a bounded channel, so the redirect response never waits on analytics
/// writes. Processed by [`crate::domain::click_worker::run_click_worker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub url_id: i64,
    pub short_code: String,
    pub ip_address: Option<String>,
}

impl ClickEvent {
    /// Creates a new click event.
    ///
    /// # Arguments
    ///
    /// - `url_id` - Id of the resolved mapping
    /// - `short_code` - The code that was visited (for logs)
    /// - `ip_address` - Best-effort client address
    pub fn new(url_id: i64, short_code: impl Into<String>, ip_address: Option<String>) -> Self {
        Self {
            url_id,
            short_code: short_code.into(),
            ip_address,
        }
    }
}
