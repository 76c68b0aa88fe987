//! Application error taxonomy and HTTP mapping.
//!
//! Every fallible operation in the service layer returns [`AppError`]. The
//! HTTP layer converts it into the standard response envelope:
//!
//! ```json
//! { "success": false, "message": "Alias is already taken" }
//! ```
//!
//! | Variant      | Status | Message                         |
//! |--------------|--------|---------------------------------|
//! | `Validation` | 400    | specific validation message     |
//! | `Conflict`   | 400    | specific conflict message       |
//! | `NotFound`   | 404    | `URL not found` / `URL expired` |
//! | `Internal`   | 500    | always `Internal Server Error`  |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;

use crate::api::dto::envelope::ApiResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },
    #[error("{message}")]
    Conflict { message: String, details: Value },
    #[error("{message}")]
    NotFound { message: String, details: Value },
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Shorthand for the conflict raised when a short code is already in use.
    pub fn alias_taken(code: &str) -> Self {
        Self::conflict("Alias is already taken", json!({ "short_code": code }))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Validation { message, .. }
            | AppError::Conflict { message, .. }
            | AppError::NotFound { message, .. }
            | AppError::Internal { message, .. } => message,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let (message, error) = match self {
            AppError::Internal { message, details } => {
                tracing::error!(%message, %details, "Request failed with internal error");
                ("Internal Server Error".to_string(), None)
            }
            AppError::Validation { message, details }
            | AppError::Conflict { message, details }
            | AppError::NotFound { message, details } => (message, non_empty(details)),
        };

        (status, ApiResponse::<()>::failure(message, error)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && db.is_unique_violation()
        {
            return AppError::conflict(
                "Alias is already taken",
                json!({ "constraint": db.constraint() }),
            );
        }

        AppError::internal("Database error", json!({ "reason": e.to_string() }))
    }
}

fn non_empty(details: Value) -> Option<Value> {
    match &details {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(details),
    }
}
