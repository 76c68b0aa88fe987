//! URL mapping entity: one short code pointing at one original URL.

use chrono::{DateTime, Utc};

/// A stored short code → original URL mapping.
///
/// Mappings are created once and never updated apart from `click_count`,
/// which the store increments atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlMapping {
    pub id: i64,
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
}

impl UrlMapping {
    /// Creates a new UrlMapping instance.
    pub fn new(
        id: i64,
        original_url: String,
        short_code: String,
        created_at: DateTime<Utc>,
        expires_at: Option<DateTime<Utc>>,
        click_count: i64,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            created_at,
            expires_at,
            click_count,
        }
    }

    /// Returns true if `expires_at` lies strictly before `now`.
    ///
    /// Mappings without an expiry never expire.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e < now)
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone)]
pub struct NewUrlMapping {
    pub original_url: String,
    pub short_code: String,
    pub expires_at: Option<DateTime<Utc>>,
}
