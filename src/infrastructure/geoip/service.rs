//! Geolocation trait.

use async_trait::async_trait;
use std::net::IpAddr;

/// Resolves an IP address to an ISO 3166-1 alpha-2 country code.
///
/// Implementations never fail: an address that cannot be resolved yields
/// `None` and the caller records it as `Unknown`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLocator: Send + Sync {
    /// Looks up the country of a public address.
    async fn lookup_country(&self, ip: IpAddr) -> Option<String>;

    /// Provider name for logs.
    fn name(&self) -> &'static str;
}
