//! Repository trait for click events and their aggregates.

use crate::domain::entities::{Click, NewClick};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for click events.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgClickRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - Process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClickRepository: Send + Sync {
    /// Inserts one click event stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record(&self, new_click: NewClick) -> Result<Click, AppError>;

    /// Returns at most `limit` clicks for a mapping, newest first.
    ///
    /// Clicks with equal timestamps are ordered by insertion, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn recent(&self, url_id: i64, limit: i64) -> Result<Vec<Click>, AppError>;

    /// Counts all clicks of a mapping grouped by the stored country value.
    ///
    /// Raw groups are returned; folding of empty values happens in the
    /// analytics service.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn count_by_country(&self, url_id: i64)
    -> Result<Vec<(Option<String>, i64)>, AppError>;
}
