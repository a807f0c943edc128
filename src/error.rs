//! Application error type shared by every layer.
//!
//! Allocation and resolution failures are first-class variants so callers can
//! tell "never existed" ([`AppError::NotFound`]) from "existed, now gone"
//! ([`AppError::Expired`]). Every variant renders as the JSON envelope
//!
//! ```json
//! { "error": { "code": "not_found", "message": "Short URL not found", "details": {} } }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error description returned to API clients.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Caller input rejected at the boundary.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Caller-chosen alias is already stored.
    #[error("Custom alias '{code}' is already in use")]
    AliasTaken { code: String },

    /// Insert lost a uniqueness race. Recovered inside the service.
    #[error("Code '{code}' was taken by a concurrent writer")]
    CodeConflict { code: String },

    /// Random generation ran out of attempts.
    #[error("Failed to allocate a unique code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },

    #[error("Short URL not found")]
    NotFound { code: String },

    #[error("Short URL has expired")]
    Expired {
        code: String,
        expired_at: DateTime<Utc>,
    },

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

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status used when the error reaches a handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::AliasTaken { .. } | Self::CodeConflict { .. } => StatusCode::CONFLICT,
            Self::CodeSpaceExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Expired { .. } => StatusCode::GONE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable identifier placed in the `error.code` field.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation_error",
            Self::AliasTaken { .. } => "alias_taken",
            Self::CodeConflict { .. } => "code_conflict",
            Self::CodeSpaceExhausted { .. } => "code_space_exhausted",
            Self::NotFound { .. } => "not_found",
            Self::Expired { .. } => "expired",
            Self::Internal { .. } => "internal_error",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let details = match self {
            Self::Validation { details, .. } | Self::Internal { details, .. } => details.clone(),
            Self::AliasTaken { code }
            | Self::CodeConflict { code }
            | Self::NotFound { code } => json!({ "code": code }),
            Self::CodeSpaceExhausted { attempts } => json!({ "attempts": attempts }),
            Self::Expired { code, expired_at } => {
                json!({ "code": code, "expired_at": expired_at })
            }
        };

        ErrorInfo {
            code: self.error_code(),
            message: self.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}
