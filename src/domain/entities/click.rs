//! Click entity representing a single resolved redirect.

use chrono::{DateTime, Utc};

/// Country recorded when geolocation is unavailable.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// A recorded visit to a short code.
///
/// Click rows are inserted independently of their mapping and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Click {
    pub id: i64,
    pub url_id: i64,
    pub clicked_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub country: String,
}

impl Click {
    /// Creates a new Click instance.
    pub fn new(
        id: i64,
        url_id: i64,
        clicked_at: DateTime<Utc>,
        ip_address: Option<String>,
        country: String,
    ) -> Self {
        Self {
            id,
            url_id,
            clicked_at,
            ip_address,
            country,
        }
    }
}

/// Input data for recording a click.
///
/// The timestamp is assigned by the store at insertion.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub url_id: i64,
    pub ip_address: Option<String>,
    pub country: String,
}
