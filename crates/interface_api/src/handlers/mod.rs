//! Request handlers, one module per resource

pub mod health;
pub mod tenants;
pub mod accounts;
pub mod journals;
pub mod ledger;
pub mod invoices;
pub mod inventory;
pub mod reports;
