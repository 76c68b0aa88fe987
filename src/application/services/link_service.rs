//! Short link creation and active-link lookup.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_alias};

/// Attempts for generated codes before giving up on collisions.
const MAX_GENERATE_ATTEMPTS: usize = 5;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Service for creating short links and resolving them by code.
///
/// Both the redirect path and analytics go through [`Self::get_active_link`],
/// so not-found and expiry rules are identical for both.
pub struct LinkService {
    repository: Arc<dyn UrlRepository>,
    base_url: String,
}

impl LinkService {
    /// Creates a new link service.
    ///
    /// `base_url` prefixes every short URL; a trailing slash is ignored.
    pub fn new(repository: Arc<dyn UrlRepository>, base_url: impl Into<String>) -> Self {
        Self {
            repository,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a short link.
    ///
    /// # Arguments
    ///
    /// - `original_url` - Target URL; required but not checked for well-formedness
    /// - `alias` - Optional custom code, used verbatim once validated; empty means none
    /// - `expires_in_hours` - Optional lifetime in hours, must be positive
    ///
    /// # Code Generation
    ///
    /// Without an alias a random code is generated. If the store reports a
    /// collision a new code is drawn, up to 5 attempts. Aliases never retry.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a missing URL, an invalid alias
    /// or a non-positive `expires_in_hours`.
    /// Returns [`AppError::Conflict`] if the alias is already taken.
    /// Returns [`AppError::Internal`] on storage errors or exhausted retries.
    pub async fn create_short_link(
        &self,
        original_url: Option<String>,
        alias: Option<String>,
        expires_in_hours: Option<f64>,
    ) -> Result<UrlMapping, AppError> {
        self.create_short_link_at(original_url, alias, expires_in_hours, Utc::now())
            .await
    }

    /// Same as [`Self::create_short_link`] with an explicit creation time.
    pub async fn create_short_link_at(
        &self,
        original_url: Option<String>,
        alias: Option<String>,
        expires_in_hours: Option<f64>,
        now: DateTime<Utc>,
    ) -> Result<UrlMapping, AppError> {
        let original_url = original_url
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| AppError::bad_request("Original URL is required", json!({})))?;

        let alias = alias.filter(|a| !a.is_empty());
        if let Some(alias) = &alias {
            validate_alias(alias)?;
        }

        let expires_at = compute_expires_at(expires_in_hours, now)?;

        let mapping = match alias {
            Some(alias) => {
                self.repository
                    .create(NewUrlMapping {
                        original_url,
                        short_code: alias,
                        expires_at,
                    })
                    .await?
            }
            None => self.create_with_generated_code(original_url, expires_at).await?,
        };

        info!(
            code = %mapping.short_code,
            expires_at = ?mapping.expires_at,
            "Short link created"
        );

        Ok(mapping)
    }

    /// Looks up a code and applies the expiry rule at the current time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] with `URL not found` for unknown codes
    /// and `URL expired` for expired ones.
    pub async fn get_active_link(&self, code: &str) -> Result<UrlMapping, AppError> {
        self.get_active_link_at(code, Utc::now()).await
    }

    /// Same as [`Self::get_active_link`] with an explicit clock.
    pub async fn get_active_link_at(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<UrlMapping, AppError> {
        let mapping = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("URL not found", json!({ "code": code })))?;

        if mapping.is_expired_at(now) {
            return Err(AppError::not_found(
                "URL expired",
                json!({ "code": code, "expires_at": mapping.expires_at }),
            ));
        }

        Ok(mapping)
    }

    /// Round-trips to the store; used by the health check.
    pub async fn check_store(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    async fn create_with_generated_code(
        &self,
        original_url: String,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<UrlMapping, AppError> {
        for attempt in 1..=MAX_GENERATE_ATTEMPTS {
            let new_mapping = NewUrlMapping {
                original_url: original_url.clone(),
                short_code: generate_code(),
                expires_at,
            };

            match self.repository.create(new_mapping).await {
                Ok(mapping) => return Ok(mapping),
                Err(AppError::Conflict { .. }) => {
                    warn!(attempt, "Generated short code collided, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "Too many collisions" }),
        ))
    }
}

/// Turns `expiresIn` (hours) into an absolute expiry.
///
/// Absent means never expires. Zero, negative, non-finite and out-of-range
/// values are rejected.
pub fn compute_expires_at(
    expires_in_hours: Option<f64>,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    let Some(hours) = expires_in_hours else {
        return Ok(None);
    };

    let invalid = || {
        AppError::bad_request(
            "expiresIn must be a positive number of hours",
            json!({ "expiresIn": hours }),
        )
    };

    if !hours.is_finite() || hours <= 0.0 {
        return Err(invalid());
    }

    let millis = hours * MILLIS_PER_HOUR;
    if millis >= i64::MAX as f64 {
        return Err(invalid());
    }

    Duration::try_milliseconds(millis.round() as i64)
        .and_then(|d| now.checked_add_signed(d))
        .map(Some)
        .ok_or_else(invalid)
}
