//! Ledger domain errors

use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::{MoneyError, PortError};
use domain_tenant::TenantError;

use crate::journal::JournalStatus;

/// Errors that can occur in the ledger domain
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input failed a domain rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// Debits and credits differ; `difference` is debit minus credit
    #[error("Unbalanced journal entry: debit minus credit is {difference}")]
    Unbalanced { difference: Decimal },

    /// The journal entry is not in a state that allows the operation
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: JournalStatus,
        to: JournalStatus,
    },

    /// A posted entry was re-posted with different lines
    #[error("Journal entry {0} is already posted with different lines")]
    ConflictingRepost(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Uniqueness or concurrent-modification conflict
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The underlying store failed
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

impl From<PortError> for LedgerError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound { entity_type, id } => LedgerError::NotFound {
                entity: entity_type,
                id,
            },
            PortError::Validation { message, .. } => LedgerError::Validation(message),
            PortError::Conflict { message } => LedgerError::Conflict(message),
            other => LedgerError::Storage(other.to_string()),
        }
    }
}

impl From<MoneyError> for LedgerError {
    fn from(err: MoneyError) -> Self {
        LedgerError::Validation(err.to_string())
    }
}

impl From<TenantError> for LedgerError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::NotFound(id) => LedgerError::NotFound {
                entity: "Tenant".to_string(),
                id,
            },
            TenantError::Storage(message) => LedgerError::Storage(message),
            other => LedgerError::Validation(other.to_string()),
        }
    }
}
