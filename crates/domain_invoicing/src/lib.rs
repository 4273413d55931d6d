//! Invoicing Domain
//!
//! Sales invoices are recorded as supplied: tax amounts and totals come from
//! the caller and are only checked for shape (non-negative, dates in order,
//! unique line numbers). No tax is computed here.

pub mod invoice;
pub mod error;
pub mod ports;
pub mod service;
pub mod adapters;

pub use invoice::{Invoice, InvoiceLine, InvoiceStatus, NewInvoice, NewInvoiceLine};
pub use error::InvoiceError;
pub use ports::InvoicePort;
pub use service::InvoiceService;
pub use adapters::InMemoryInvoiceStore;
