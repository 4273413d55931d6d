//! Infrastructure Database Layer
//!
//! PostgreSQL implementations of the domain ports, built on SQLx.
//!
//! # Architecture
//!
//! Repositories own the SQL and the row types; adapters implement the domain
//! port traits on top of them and translate [`DatabaseError`] into
//! `PortError`. Enumerations are stored as their wire strings in TEXT
//! columns and parsed back when rows are decoded.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresAdapters};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/accounting")).await?;
//! run_migrations(&pool).await?;
//! let adapters = PostgresAdapters::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::{
    PostgresAdapters, PostgresInventoryAdapter, PostgresInvoiceAdapter, PostgresLedgerAdapter,
    PostgresTenantAdapter,
};
