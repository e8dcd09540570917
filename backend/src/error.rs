//! Error handling for the Whiskey Wiz server
//!
//! Every error is rendered as `{"error": {"code", "message", ...}}` with a
//! matching HTTP status.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{FieldViolation, SampleId, ScoringError};
use thiserror::Error;
use uuid::Uuid;

use crate::store::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Identity errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid scoring configuration")]
    InvalidConfiguration(Vec<FieldViolation>),

    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    // Game flow errors
    #[error("Submission is missing samples: {missing:?}")]
    IncompleteSubmission { missing: Vec<SampleId> },

    #[error("Quarter {0} is not open for play")]
    QuarterClosed(Uuid),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::InvalidInput { field, reason } => AppError::InvalidInput { field, reason },
            ScoringError::InvalidConfiguration(violations) => {
                AppError::InvalidConfiguration(violations)
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(what) => AppError::Conflict(what),
            StoreError::NotFound(what) => AppError::NotFound(what),
            other => AppError::Store(other),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        match fields.first() {
            Some((field, errs)) => AppError::Validation {
                field: field.to_string(),
                message: errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("{} is invalid", field)),
            },
            None => AppError::Validation {
                field: "body".to_string(),
                message: errors.to_string(),
            },
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violations: Option<Vec<FieldViolation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_samples: Option<Vec<SampleId>>,
}

impl ErrorDetail {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
            violations: None,
            missing_samples: None,
        }
    }

    fn with_field(mut self, field: &str) -> Self {
        self.field = Some(field.to_string());
        self
    }
}

impl AppError {
    fn status_and_detail(&self) -> (StatusCode, ErrorDetail) {
        match self {
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("UNAUTHORIZED", msg.clone()),
            ),
            AppError::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new("FORBIDDEN", msg.clone()),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", message.clone()).with_field(field),
            ),
            AppError::InvalidConfiguration(violations) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    violations: Some(violations.clone()),
                    ..ErrorDetail::new(
                        "INVALID_CONFIGURATION",
                        format!("{} problem(s) found in the quarter", violations.len()),
                    )
                },
            ),
            AppError::InvalidInput { field, reason } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("INVALID_INPUT", reason.clone()).with_field(field),
            ),
            AppError::IncompleteSubmission { missing } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    missing_samples: Some(missing.clone()),
                    ..ErrorDetail::new(
                        "INCOMPLETE_SUBMISSION",
                        "Every sample needs a guess before the game can be submitted",
                    )
                },
            ),
            AppError::QuarterClosed(id) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new("QUARTER_CLOSED", format!("Quarter {} is not open for play", id)),
            ),
            AppError::Conflict(what) => (
                StatusCode::CONFLICT,
                ErrorDetail::new("CONFLICT", format!("Conflict: {}", what)),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::Store(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail::new("STORAGE_ERROR", "The results store is unavailable"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = self.status_and_detail();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, code = %error_detail.code, "request rejected");
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers and services
pub type AppResult<T> = Result<T, AppError>;
