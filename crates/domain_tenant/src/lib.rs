//! Tenant Domain
//!
//! A tenant is the business unit every ledger, invoice and stock record
//! belongs to. Each tenant is registered under a unique GSTIN and carries
//! its locale: currency, country, timezone and fiscal-year start.

pub mod tenant;
pub mod gstin;
pub mod error;
pub mod ports;
pub mod service;
pub mod adapters;

pub use tenant::{Tenant, NewTenant, BusinessType, ValuationMethod};
pub use gstin::Gstin;
pub use error::TenantError;
pub use ports::TenantPort;
pub use service::TenantService;
pub use adapters::InMemoryTenantStore;
