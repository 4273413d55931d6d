//! Invoicing Domain Ports

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, InvoiceId, PortError, TenantScope};

use crate::invoice::Invoice;

#[async_trait]
pub trait InvoicePort: DomainPort + HealthCheckable {
    /// Stores an invoice together with its lines
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError>;

    /// Retrieves an invoice with its lines, or `PortError::NotFound`
    async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError>;

    /// Lists invoices visible in the scope, newest invoice date first
    async fn list_invoices(&self, scope: TenantScope) -> Result<Vec<Invoice>, PortError>;
}
