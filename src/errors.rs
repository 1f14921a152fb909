//! Error taxonomy for the query engine.
//!
//! Validation failures are detected entirely before any store access and list
//! every offending field. Store failures are logged server-side via `tracing`
//! and surfaced as a sanitized 500; internal detail is never sent to clients.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::fmt;

/// One malformed or unrecognized query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Failure reported by an [`crate::store::ApplicationStore`] implementation.
#[derive(Debug)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

impl From<DbErr> for StoreError {
    fn from(err: DbErr) -> Self {
        Self(err.to_string())
    }
}

/// API error with status mapping and sanitized response bodies.
#[derive(Debug)]
pub enum ApiError {
    /// 422 - one or more query parameters failed validation.
    Validation { errors: Vec<ValidationError> },

    /// 401 - no authenticated identity on the request.
    Unauthorized { message: String },

    /// 404 - referenced resource absent (produced by collaborators, not this core).
    NotFound { resource: String, id: Option<String> },

    /// 500 - store failure (detail logged, not exposed).
    Store { internal: StoreError },

    /// 500 - anything else (detail logged, not exposed).
    Internal { internal: String },
}

impl ApiError {
    pub fn validation(errors: Vec<ValidationError>) -> Self {
        Self::Validation { errors }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>, id: Option<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id,
        }
    }

    pub fn internal(internal: impl Into<String>) -> Self {
        Self::Internal {
            internal: internal.into(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            Self::Validation { .. } => "Validation failed".to_string(),
            Self::Unauthorized { message } => message.clone(),
            Self::NotFound { resource, id } => match id {
                Some(id) => format!("{resource} with ID '{id}' not found"),
                None => format!("{resource} not found"),
            },
            Self::Store { .. } => "A storage error occurred".to_string(),
            Self::Internal { .. } => "An internal error occurred".to_string(),
        }
    }

    fn log_internal(&self) {
        match self {
            Self::Store { internal } => {
                tracing::error!(error = %internal, "store error");
            }
            Self::Internal { internal } => {
                tracing::error!(details = %internal, "internal error");
            }
            Self::Validation { errors } => {
                tracing::debug!(count = errors.len(), "request rejected by validation");
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "api error"
                );
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(internal: StoreError) -> Self {
        Self::Store { internal }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self::Validation {
            errors: vec![error],
        }
    }
}

/// Sanitized error body: `{ "success": false, "error": .., "details": [..] }`.
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log_internal();

        let status = self.status_code();
        let details = match &self {
            Self::Validation { errors } => {
                Some(errors.iter().map(ToString::to_string).collect())
            }
            _ => None,
        };
        let body = ErrorBody {
            success: false,
            error: self.user_message(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation { errors } => {
                let fields: Vec<String> = errors.iter().map(ToString::to_string).collect();
                write!(f, "validation failed: {}", fields.join(", "))
            }
            _ => write!(f, "{}", self.user_message()),
        }
    }
}

impl std::error::Error for ApiError {}
