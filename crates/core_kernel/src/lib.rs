//! Core Kernel - Foundational types and utilities for the accounting service
//!
//! This crate provides the building blocks shared by every domain crate:
//! - Exact ledger amounts and currency codes
//! - Strongly-typed identifiers
//! - Tenant scoping for queries
//! - Timezone and fiscal-year helpers
//! - Port error and health-check plumbing for the hexagonal adapters

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod scope;
pub mod ports;

pub use money::{Currency, MoneyError, Rate, LEDGER_AMOUNT_LIMIT, LEDGER_SCALE};
pub use temporal::{DateRange, TemporalError, Timezone};
pub use identifiers::{
    TenantId, AccountId, JournalEntryId, PostingId, LedgerEntryId,
    InvoiceId, InvoiceLineId, CustomerId, ProductId,
    InventoryBalanceId, InventoryMovementId,
};
pub use scope::TenantScope;
pub use ports::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError,
};
