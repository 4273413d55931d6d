//! Test Utilities Crate
//!
//! Shared test infrastructure for the accounting service test suite.
//!
//! # Modules
//!
//! - `fixtures`: Deterministic ids, GSTINs, dates and account codes
//! - `builders`: Builders for registration payloads and an in-memory service harness
//! - `database`: PostgreSQL testcontainer management
//! - `assertions`: Ledger-aware assertion helpers
//! - `generators`: Property-based test data generators

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
