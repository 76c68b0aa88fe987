//! No-op geolocation for deployments without a GeoIP database.

use super::service::GeoLocator;
use async_trait::async_trait;
use std::net::IpAddr;
use tracing::debug;

/// A locator that never resolves an address.
pub struct NullGeoLocator;

impl NullGeoLocator {
    /// Creates a new NullGeoLocator instance.
    pub fn new() -> Self {
        debug!("Using NullGeoLocator (geolocation disabled)");
        Self
    }
}

impl Default for NullGeoLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GeoLocator for NullGeoLocator {
    async fn lookup_country(&self, _ip: IpAddr) -> Option<String> {
        None
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
