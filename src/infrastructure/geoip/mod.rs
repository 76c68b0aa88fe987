//! IP geolocation for click analytics.
//!
//! Provides a [`GeoLocator`] trait with two implementations:
//! - [`MaxMindGeoLocator`] - Lookups against a local MaxMind `.mmdb` database
//! - [`NullGeoLocator`] - Resolves nothing; every click is attributed to `Unknown`

mod maxmind;
mod null_geo;
mod service;

pub use maxmind::MaxMindGeoLocator;
pub use null_geo::NullGeoLocator;
pub use service::GeoLocator;

#[cfg(test)]
pub use service::MockGeoLocator;

use std::sync::Arc;
use tracing::{info, warn};

/// Builds the locator configured by `GEOIP_DB_PATH`.
///
/// Falls back to [`NullGeoLocator`] when no path is configured or the
/// database cannot be opened.
pub fn from_config(db_path: Option<&str>) -> Arc<dyn GeoLocator> {
    let locator: Arc<dyn GeoLocator> = match db_path {
        Some(path) => match MaxMindGeoLocator::open(path) {
            Ok(locator) => Arc::new(locator),
            Err(e) => {
                warn!(
                    "GeoIP: failed to open MaxMind database at {}: {}. Countries will be Unknown.",
                    path, e
                );
                Arc::new(NullGeoLocator::new())
            }
        },
        None => Arc::new(NullGeoLocator::new()),
    };

    info!("GeoIP: using {} locator", locator.name());
    locator
}
