//! API error handling
//!
//! Every domain error reaches the client as `{error, message, details?}`.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

use domain_inventory::InventoryError;
use domain_invoicing::InvoiceError;
use domain_ledger::LedgerError;
use domain_tenant::TenantError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed JSON, query string or path
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Well-formed input that breaks a domain rule
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<Vec<String>>,
    },

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation {
            message: message.into(),
            details: None,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Validation { message, details } => {
                (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message, details)
            }
            ApiError::Internal(msg) => {
                error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::Storage(msg) => {
                error!(error = %msg, "Storage failure");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", msg, None)
            }
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        if details.is_empty() {
            details.push(errors.to_string());
        }
        details.sort();

        ApiError::Validation {
            message: "request failed validation".to_string(),
            details: Some(details),
        }
    }
}

impl From<TenantError> for ApiError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TenantError::DuplicateGstin(_) => ApiError::Conflict(err.to_string()),
            TenantError::InvalidGstin(_) | TenantError::Validation(_) => {
                ApiError::validation(err.to_string())
            }
            TenantError::Storage(msg) => ApiError::Storage(msg),
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(msg) => ApiError::validation(msg),
            LedgerError::Unbalanced { difference } => ApiError::Validation {
                message: err.to_string(),
                details: Some(vec![format!("difference: {}", difference)]),
            },
            LedgerError::InvalidTransition { .. }
            | LedgerError::ConflictingRepost(_)
            | LedgerError::Conflict(_) => ApiError::Conflict(err.to_string()),
            LedgerError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            LedgerError::Storage(msg) => ApiError::Storage(msg),
        }
    }
}

impl From<InvoiceError> for ApiError {
    fn from(err: InvoiceError) -> Self {
        match err {
            InvoiceError::NotFound(_) | InvoiceError::TenantNotFound(_) => {
                ApiError::NotFound(err.to_string())
            }
            InvoiceError::Validation(msg) => ApiError::validation(msg),
            InvoiceError::Conflict(_) => ApiError::Conflict(err.to_string()),
            InvoiceError::Storage(msg) => ApiError::Storage(msg),
        }
    }
}

impl From<InventoryError> for ApiError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::TenantNotFound(_) => ApiError::NotFound(err.to_string()),
            InventoryError::Validation(_) | InventoryError::InsufficientStock { .. } => {
                ApiError::validation(err.to_string())
            }
            InventoryError::Conflict(_) => ApiError::Conflict(err.to_string()),
            InventoryError::Storage(msg) => ApiError::Storage(msg),
        }
    }
}
