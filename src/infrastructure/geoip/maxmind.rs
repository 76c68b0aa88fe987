//! MaxMind GeoLite2 / GeoIP2 database lookups.

use super::service::GeoLocator;
use async_trait::async_trait;
use maxminddb::Reader;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::trace;

/// Locator backed by a memory-loaded MaxMind database.
pub struct MaxMindGeoLocator {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindGeoLocator {
    /// Loads the database file into memory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or not a valid MaxMind database.
    pub fn open(path: &str) -> Result<Self, maxminddb::MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

#[async_trait]
impl GeoLocator for MaxMindGeoLocator {
    async fn lookup_country(&self, ip: IpAddr) -> Option<String> {
        let result = self.reader.lookup(ip).ok()?;
        let city: maxminddb::geoip2::City = result.decode().ok()??;

        let country = city.country.iso_code.map(String::from);
        trace!("MaxMind lookup for {}: country={:?}", ip, country);

        country
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
