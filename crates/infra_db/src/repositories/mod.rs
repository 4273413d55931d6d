//! Repository implementations for domain entities
//!
//! Each repository owns the SQL for one domain and maps rows to domain
//! types. Multi-statement writes run inside a single transaction.

pub mod tenant;
pub mod ledger;
pub mod invoice;
pub mod inventory;

pub use tenant::TenantRepository;
pub use ledger::LedgerRepository;
pub use invoice::InvoiceRepository;
pub use inventory::InventoryRepository;

use std::str::FromStr;

use crate::error::DatabaseError;

/// Parses a TEXT column holding an enumeration's wire name
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DatabaseError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| DatabaseError::decode(format!("{}: {}", column, e)))
}

/// Converts a stored INTEGER to an unsigned domain count
pub(crate) fn unsigned_column(column: &str, value: i32) -> Result<u32, DatabaseError> {
    u32::try_from(value).map_err(|_| DatabaseError::decode(format!("{}: negative value {}", column, value)))
}

pub(crate) fn signed_column(column: &str, value: u32) -> Result<i32, DatabaseError> {
    i32::try_from(value).map_err(|_| DatabaseError::decode(format!("{}: {} out of range", column, value)))
}

/// Bind value for `($1::uuid IS NULL OR tenant_id = $1)` filters
pub(crate) fn scope_param(scope: core_kernel::TenantScope) -> Option<uuid::Uuid> {
    scope.tenant().map(uuid::Uuid::from)
}
