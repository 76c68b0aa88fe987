//! Short code generation and alias validation.

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Length of generated codes.
pub const GENERATED_CODE_LENGTH: usize = 7;

/// Maximum length of a short code, generated or custom.
pub const MAX_CODE_LENGTH: usize = 20;

/// Compiled regex for alias validation.
static ALIAS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Codes that would shadow fixed routes.
const RESERVED_CODES: &[&str] = &["analytics", "api", "health", "shorten"];

/// Generates a random alphanumeric short code.
///
/// 62^7 possible codes. Uniqueness is not checked here; the store rejects
/// a collision and the caller may retry.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code();
/// assert_eq!(code.len(), 7);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_CODE_LENGTH)
        .map(char::from)
        .collect()
}

/// Validates a user-provided alias.
///
/// # Rules
///
/// - Not empty, at most 20 characters
/// - Only letters, digits, hyphens and underscores
/// - Not a reserved route name
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() {
        return Err(AppError::bad_request("Alias must not be empty", json!({})));
    }

    if alias.chars().count() > MAX_CODE_LENGTH {
        return Err(AppError::bad_request(
            "Alias must be 20 characters or less",
            json!({ "provided_length": alias.chars().count() }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Alias can only contain letters, numbers, hyphens, and underscores",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_CODES.contains(&alias) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
