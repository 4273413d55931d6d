//! Invoice adapters bundled with the domain

pub mod memory;

pub use memory::InMemoryInvoiceStore;
