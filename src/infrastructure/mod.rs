//! Infrastructure layer for external integrations.
//!
//! # Modules
//!
//! - [`geoip`] - IP geolocation (MaxMind and no-op implementations)
//! - [`persistence`] - PostgreSQL and in-memory repository implementations

pub mod geoip;
pub mod persistence;
