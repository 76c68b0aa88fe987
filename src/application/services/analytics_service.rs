//! Per-link analytics: recent clicks and geography.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::application::services::LinkService;
use crate::domain::entities::{Click, UNKNOWN_COUNTRY};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

/// Number of clicks returned in `recent_clicks`.
pub const RECENT_CLICKS_LIMIT: i64 = 10;

/// Analytics for one short link.
#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub recent_clicks: Vec<Click>,
    pub geography: BTreeMap<String, i64>,
}

/// Service aggregating stored click events for a link.
///
/// Lookup follows the same not-found and expiry rules as redirects but
/// never records a click.
pub struct AnalyticsService {
    links: Arc<LinkService>,
    clicks: Arc<dyn ClickRepository>,
}

impl AnalyticsService {
    pub fn new(links: Arc<LinkService>, clicks: Arc<dyn ClickRepository>) -> Self {
        Self { links, clicks }
    }

    /// Builds the analytics report for a code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or expired codes.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn get_analytics(&self, code: &str) -> Result<AnalyticsReport, AppError> {
        let mapping = self.links.get_active_link(code).await?;

        let recent_clicks = self.clicks.recent(mapping.id, RECENT_CLICKS_LIMIT).await?;
        let groups = self.clicks.count_by_country(mapping.id).await?;

        Ok(AnalyticsReport {
            original_url: mapping.original_url,
            short_code: mapping.short_code,
            created_at: mapping.created_at,
            expires_at: mapping.expires_at,
            click_count: mapping.click_count,
            recent_clicks,
            geography: fold_country_counts(groups),
        })
    }
}

/// Merges raw per-country groups into the geography map.
///
/// Null and blank countries are counted under `Unknown`.
pub fn fold_country_counts(groups: Vec<(Option<String>, i64)>) -> BTreeMap<String, i64> {
    let mut geography = BTreeMap::new();

    for (country, count) in groups {
        let key = country
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string());

        *geography.entry(key).or_insert(0) += count.max(0);
    }

    geography
}
