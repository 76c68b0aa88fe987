//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! with `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`UrlRepository`] - URL mapping creation, lookup and click counting
//! - [`ClickRepository`] - Click event insertion and aggregation

pub mod click_repository;
pub mod url_repository;

pub use click_repository::ClickRepository;
pub use url_repository::UrlRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use url_repository::MockUrlRepository;
