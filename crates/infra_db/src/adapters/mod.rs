//! Domain Adapters
//!
//! PostgreSQL implementations of the domain ports. Each adapter wraps the
//! matching repository and translates `DatabaseError` into `PortError`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::PostgresAdapters;
//! use domain_tenant::TenantPort;
//!
//! let adapters = PostgresAdapters::new(pool);
//! let tenant = adapters.tenants.get_tenant(tenant_id).await?;
//! ```

pub mod tenant;
pub mod ledger;
pub mod invoice;
pub mod inventory;

pub use tenant::PostgresTenantAdapter;
pub use ledger::PostgresLedgerAdapter;
pub use invoice::PostgresInvoiceAdapter;
pub use inventory::PostgresInventoryAdapter;

use sqlx::PgPool;
use std::time::Instant;

use core_kernel::HealthCheckResult;

/// One adapter per port, sharing a pool
#[derive(Debug, Clone)]
pub struct PostgresAdapters {
    pub tenants: PostgresTenantAdapter,
    pub ledger: PostgresLedgerAdapter,
    pub invoices: PostgresInvoiceAdapter,
    pub inventory: PostgresInventoryAdapter,
}

impl PostgresAdapters {
    pub fn new(pool: PgPool) -> Self {
        Self {
            tenants: PostgresTenantAdapter::new(pool.clone()),
            ledger: PostgresLedgerAdapter::new(pool.clone()),
            invoices: PostgresInvoiceAdapter::new(pool.clone()),
            inventory: PostgresInventoryAdapter::new(pool),
        }
    }
}

/// Runs `SELECT 1` and reports latency
pub(crate) async fn ping(pool: &PgPool, adapter_id: &str) -> HealthCheckResult {
    let start = Instant::now();

    let result = sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthCheckResult::healthy(adapter_id, latency_ms),
        Err(e) => HealthCheckResult::unhealthy(adapter_id, latency_ms, format!("Database error: {}", e)),
    }
}
