//! Tenant domain errors

use core_kernel::{PortError, TemporalError};
use thiserror::Error;

/// Errors that can occur in the tenant domain
#[derive(Debug, Error)]
pub enum TenantError {
    /// Tenant with the given ID was not found
    #[error("Tenant not found: {0}")]
    NotFound(String),

    /// Another tenant is already registered under this GSTIN
    #[error("Duplicate GSTIN: {0}")]
    DuplicateGstin(String),

    /// GSTIN failed the format check
    #[error("Invalid GSTIN: {0}")]
    InvalidGstin(String),

    /// Invalid tenant data provided
    #[error("Invalid tenant data: {0}")]
    Validation(String),

    /// The underlying store failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TenantError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        TenantError::NotFound(id.to_string())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        TenantError::Validation(message.into())
    }
}

impl From<PortError> for TenantError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => TenantError::NotFound(id),
            PortError::Conflict { message } => TenantError::DuplicateGstin(message),
            PortError::Validation { message, .. } => TenantError::Validation(message),
            other => TenantError::Storage(other.to_string()),
        }
    }
}

impl From<TemporalError> for TenantError {
    fn from(err: TemporalError) -> Self {
        TenantError::Validation(err.to_string())
    }
}
