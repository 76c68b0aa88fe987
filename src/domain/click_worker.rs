//! Click recording and the background worker that drives it.
//!
//! The redirect path only enqueues [`ClickEvent`]s. Everything that touches
//! the store happens here, after the visitor already has their redirect, so
//! failures are logged and counted but never reported to the requester.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc};
use tokio::task::JoinSet;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info};

use crate::domain::click_event::ClickEvent;
use crate::domain::entities::{Click, NewClick, UNKNOWN_COUNTRY};
use crate::domain::repositories::{ClickRepository, UrlRepository};
use crate::error::AppError;
use crate::infrastructure::geoip::GeoLocator;

/// Retries per store write after the first attempt.
const MAX_RETRIES: usize = 3;

/// Persists click events: counter increment, geolocation, event insert.
pub struct ClickRecorder {
    urls: Arc<dyn UrlRepository>,
    clicks: Arc<dyn ClickRepository>,
    geo: Arc<dyn GeoLocator>,
    retry_base_ms: u64,
}

impl ClickRecorder {
    pub fn new(
        urls: Arc<dyn UrlRepository>,
        clicks: Arc<dyn ClickRepository>,
        geo: Arc<dyn GeoLocator>,
    ) -> Self {
        Self {
            urls,
            clicks,
            geo,
            retry_base_ms: 50,
        }
    }

    /// Overrides the base delay of the exponential backoff.
    pub fn with_retry_base_ms(mut self, retry_base_ms: u64) -> Self {
        self.retry_base_ms = retry_base_ms;
        self
    }

    /// Records one click, retrying each store write independently.
    ///
    /// The counter is incremented before the event is inserted. Retrying the
    /// writes separately keeps a failed insert from incrementing the counter
    /// twice.
    ///
    /// # Errors
    ///
    /// Returns the last store error once a write has used up its retries.
    pub async fn record_with_retry(&self, event: ClickEvent) -> Result<Click, AppError> {
        let url_id = event.url_id;

        Retry::start(self.backoff(), || self.urls.increment_click_count(url_id)).await?;

        let country = self.resolve_country(event.ip_address.as_deref()).await;
        let new_click = NewClick {
            url_id,
            ip_address: event.ip_address,
            country,
        };

        Retry::start(self.backoff(), || self.clicks.record(new_click.clone())).await
    }

    /// Maps a client address to a country code, or `Unknown`.
    ///
    /// Missing, unparsable and non-public addresses are never looked up.
    pub async fn resolve_country(&self, ip_address: Option<&str>) -> String {
        let Some(ip) = ip_address.and_then(|s| s.trim().parse::<IpAddr>().ok()) else {
            return UNKNOWN_COUNTRY.to_string();
        };

        if !is_public(&ip) {
            return UNKNOWN_COUNTRY.to_string();
        }

        self.geo
            .lookup_country(ip)
            .await
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_COUNTRY.to_string())
    }

    /// Delays of `base`, `2 * base`, `4 * base`, each jittered.
    fn backoff(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBackoff::from_millis(2)
            .factor((self.retry_base_ms / 2).max(1))
            .map(jitter)
            .take(MAX_RETRIES)
    }
}

fn is_public(ip: &IpAddr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() || ip.is_multicast() {
        return false;
    }

    match ip {
        IpAddr::V4(v4) => !(v4.is_private() || v4.is_link_local() || v4.is_broadcast()),
        IpAddr::V6(v6) => !(v6.is_unique_local() || v6.is_unicast_link_local()),
    }
}

/// Drains the click queue until every sender is dropped.
///
/// Up to `concurrency` events are recorded at once. On shutdown the loop
/// stops accepting once the channel closes and waits for in-flight
/// recordings before returning.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    recorder: Arc<ClickRecorder>,
    concurrency: usize,
) {
    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };

        let recorder = recorder.clone();
        tasks.spawn(async move {
            let _permit = permit;
            persist(&recorder, event).await;
        });

        while tasks.try_join_next().is_some() {}
    }

    while tasks.join_next().await.is_some() {}
    info!("Click worker stopped");
}

async fn persist(recorder: &ClickRecorder, event: ClickEvent) {
    let code = event.short_code.clone();
    let url_id = event.url_id;

    match recorder.record_with_retry(event).await {
        Ok(click) => {
            metrics::counter!("click_events_recorded_total").increment(1);
            debug!(code = %code, country = %click.country, "Click recorded");
        }
        Err(e) => {
            metrics::counter!("click_events_failed_total").increment(1);
            error!(code = %code, url_id, "Failed to record click: {}", e);
        }
    }
}
