//! Inventory domain errors

use core_kernel::{MoneyError, PortError};
use domain_tenant::TenantError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Tenant not found: {0}")]
    TenantNotFound(String),

    #[error("Invalid movement: {0}")]
    Validation(String),

    /// The movement would take on-hand stock below zero
    #[error("Insufficient stock for product {product_id}: on hand {on_hand}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        on_hand: i64,
        requested: u32,
    },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl InventoryError {
    pub fn invalid(message: impl Into<String>) -> Self {
        InventoryError::Validation(message.into())
    }
}

impl From<PortError> for InventoryError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Validation { message, .. } => InventoryError::Validation(message),
            PortError::Conflict { message } => InventoryError::Conflict(message),
            other => InventoryError::Storage(other.to_string()),
        }
    }
}

impl From<TenantError> for InventoryError {
    fn from(err: TenantError) -> Self {
        match err {
            TenantError::NotFound(id) => InventoryError::TenantNotFound(id),
            TenantError::Storage(message) => InventoryError::Storage(message),
            other => InventoryError::Validation(other.to_string()),
        }
    }
}

impl From<MoneyError> for InventoryError {
    fn from(err: MoneyError) -> Self {
        InventoryError::Validation(err.to_string())
    }
}

/// Lets adapters surface a refused balance update through their port
impl From<InventoryError> for PortError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Conflict(message) => PortError::conflict(message),
            InventoryError::Storage(message) => PortError::internal(message),
            other => PortError::validation(other.to_string()),
        }
    }
}
