//! Repository trait for URL mapping storage.

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for URL mappings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Inserts a new mapping.
    ///
    /// The uniqueness check and the insert happen atomically: of several
    /// concurrent inserts with the same code, exactly one succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code is already taken.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn create(&self, new_mapping: NewUrlMapping) -> Result<UrlMapping, AppError>;

    /// Finds a mapping by its short code.
    ///
    /// Expired mappings are returned as-is; expiry is decided by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<UrlMapping>, AppError>;

    /// Atomically increments `click_count` of the mapping with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_click_count(&self, url_id: i64) -> Result<(), AppError>;

    /// Cheap round-trip used by the health check.
    async fn ping(&self) -> Result<(), AppError>;
}
