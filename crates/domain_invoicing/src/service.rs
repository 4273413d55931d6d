//! Invoice application service

use std::sync::Arc;
use tracing::{info, instrument};

use core_kernel::{InvoiceId, TenantScope};
use domain_tenant::TenantPort;

use crate::error::InvoiceError;
use crate::invoice::{Invoice, NewInvoice};
use crate::ports::InvoicePort;

#[derive(Clone)]
pub struct InvoiceService {
    port: Arc<dyn InvoicePort>,
    tenants: Arc<dyn TenantPort>,
}

impl InvoiceService {
    pub fn new(port: Arc<dyn InvoicePort>, tenants: Arc<dyn TenantPort>) -> Self {
        Self { port, tenants }
    }

    /// Records an invoice for an existing tenant
    #[instrument(skip(self, new), fields(tenant_id = %new.tenant_id, invoice_number = %new.invoice_number))]
    pub async fn create(&self, new: NewInvoice) -> Result<Invoice, InvoiceError> {
        let tenant = self.tenants.get_tenant(new.tenant_id).await.map_err(|e| {
            if e.is_not_found() {
                InvoiceError::TenantNotFound(new.tenant_id.to_string())
            } else {
                InvoiceError::from(e)
            }
        })?;

        let invoice = Invoice::create(new, tenant.today())?;
        self.port.insert_invoice(&invoice).await?;

        info!(invoice_id = %invoice.id, lines = invoice.lines.len(), "Invoice recorded");
        Ok(invoice)
    }

    pub async fn get(&self, id: InvoiceId) -> Result<Invoice, InvoiceError> {
        Ok(self.port.get_invoice(id).await?)
    }

    pub async fn list(&self, scope: TenantScope) -> Result<Vec<Invoice>, InvoiceError> {
        Ok(self.port.list_invoices(scope).await?)
    }
}
