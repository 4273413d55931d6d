//! In-memory implementation of `InvoicePort`

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{
    DomainPort, HealthCheckResult, HealthCheckable, InvoiceId, PortError, TenantScope,
};

use crate::invoice::Invoice;
use crate::ports::InvoicePort;

#[derive(Debug, Default, Clone)]
pub struct InMemoryInvoiceStore {
    invoices: Arc<RwLock<HashMap<InvoiceId, Invoice>>>,
}

impl InMemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DomainPort for InMemoryInvoiceStore {}

#[async_trait]
impl HealthCheckable for InMemoryInvoiceStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-invoices", 0)
    }
}

#[async_trait]
impl InvoicePort for InMemoryInvoiceStore {
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<(), PortError> {
        let mut invoices = self.invoices.write().await;
        if invoices.contains_key(&invoice.id) {
            return Err(PortError::conflict(format!("invoice {} already exists", invoice.id)));
        }
        invoices.insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn get_invoice(&self, id: InvoiceId) -> Result<Invoice, PortError> {
        self.invoices
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Invoice", id))
    }

    async fn list_invoices(&self, scope: TenantScope) -> Result<Vec<Invoice>, PortError> {
        let mut invoices: Vec<Invoice> = self
            .invoices
            .read()
            .await
            .values()
            .filter(|i| scope.matches(i.tenant_id))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| {
            b.invoice_date
                .cmp(&a.invoice_date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(invoices)
    }
}
