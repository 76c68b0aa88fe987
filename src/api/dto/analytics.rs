//! DTOs for the analytics endpoint.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::application::services::AnalyticsReport;
use crate::domain::entities::Click;

/// Analytics payload for one short link.
///
/// `expires_at` is serialized as `null` for links that never expire.
#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub click_count: i64,
    pub recent_clicks: Vec<ClickInfo>,
    pub geography: BTreeMap<String, i64>,
}

/// One entry of `recent_clicks`.
#[derive(Debug, Serialize)]
pub struct ClickInfo {
    pub clicked_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub country: String,
}

impl From<Click> for ClickInfo {
    fn from(click: Click) -> Self {
        Self {
            clicked_at: click.clicked_at,
            ip_address: click.ip_address,
            country: click.country,
        }
    }
}

impl From<AnalyticsReport> for AnalyticsResponse {
    fn from(report: AnalyticsReport) -> Self {
        Self {
            original_url: report.original_url,
            short_code: report.short_code,
            created_at: report.created_at,
            expires_at: report.expires_at,
            click_count: report.click_count,
            recent_clicks: report.recent_clicks.into_iter().map(ClickInfo::from).collect(),
            geography: report.geography,
        }
    }
}
