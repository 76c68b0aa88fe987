//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`UrlMapping`] - A short code → original URL mapping
//! - [`Click`] - One recorded visit to a short code
//!
//! Creation inputs live in separate structs (`NewUrlMapping`, `NewClick`)
//! because ids and timestamps are assigned by the store.

pub mod click;
pub mod url_mapping;

pub use click::{Click, NewClick, UNKNOWN_COUNTRY};
pub use url_mapping::{NewUrlMapping, UrlMapping};
