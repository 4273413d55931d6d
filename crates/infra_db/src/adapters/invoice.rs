//! PostgreSQL adapter for `InvoicePort`

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, InvoiceId, PortError, TenantScope,
};
use domain_invoicing::{Invoice, InvoicePort};

use crate::repositories::InvoiceRepository;

#[derive(Debug, Clone)]
pub struct PostgresInvoiceAdapter {
    repository: InvoiceRepository,
    pool: PgPool,
}

impl PostgresInvoiceAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: InvoiceRepository::new(pool.clone()),
            pool,
        }
    }
}

impl DomainPort for PostgresInvoiceAdapter {}

#[async_trait]
impl HealthCheckable for PostgresInvoiceAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-invoice-adapter").await
    }
}

#[async_trait]
impl InvoicePort for PostgresInvoiceAdapter {
    #[instrument(skip(self, invoice), fields(invoice_id = %invoice.id))]
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        Ok(self.repository.insert(invoice).await?)
    }

    async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError> {
        Ok(self.repository.get(id).await?)
    }

    async fn list_invoices(&self, scope: TenantScope) -> Result<Vec<Invoice>, PortError> {
        Ok(self.repository.list(scope).await?)
    }
}
