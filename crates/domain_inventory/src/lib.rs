//! Inventory Domain
//!
//! Stock is tracked as an append-only list of movements per tenant and
//! product. Each recorded movement updates the product's balance in the same
//! store transaction, and no movement may take the on-hand quantity below
//! zero. Costing (FIFO, weighted average) is not performed; value fields are
//! carried as recorded.

pub mod movement;
pub mod balance;
pub mod error;
pub mod ports;
pub mod service;
pub mod adapters;

pub use movement::{InventoryMovement, NewMovement, TransactionType};
pub use balance::InventoryBalance;
pub use error::InventoryError;
pub use ports::InventoryPort;
pub use service::InventoryService;
pub use adapters::InMemoryInventoryStore;
