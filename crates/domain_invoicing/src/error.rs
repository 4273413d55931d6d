//! Invoicing domain errors

use core_kernel::{MoneyError, PortError};
use domain_tenant::TenantError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("Invoice not found: {0}")]
    NotFound(String),

    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Invalid invoice: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl InvoiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        InvoiceError::Validation(message.into())
    }
}

impl From<PortError> for InvoiceError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { id, .. } => InvoiceError::NotFound(id),
            PortError::Validation { message, .. } => InvoiceError::Validation(message),
            PortError::Conflict { message } => InvoiceError::Conflict(message),
            other => InvoiceError::Storage(other.to_string()),
        }
    }
}

impl From<TenantError> for InvoiceError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::NotFound(id) => InvoiceError::TenantNotFound(id),
            TenantError::Storage(message) => InvoiceError::Storage(message),
            other => InvoiceError::Validation(other.to_string()),
        }
    }
}

impl From<MoneyError> for InvoiceError {
    fn from(err: MoneyError) -> Self {
        InvoiceError::Validation(err.to_string())
    }
}
