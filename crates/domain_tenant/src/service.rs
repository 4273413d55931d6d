//! Tenant application service

use std::sync::Arc;
use tracing::{info, instrument};

use core_kernel::TenantId;

use crate::error::TenantError;
use crate::ports::TenantPort;
use crate::tenant::{NewTenant, Tenant};

#[derive(Clone)]
pub struct TenantService {
    port: Arc<dyn TenantPort>,
}

impl TenantService {
    pub fn new(port: Arc<dyn TenantPort>) -> Self {
        Self { port }
    }

    pub fn port(&self) -> Arc<dyn TenantPort> {
        Arc::clone(&self.port)
    }

    /// Registers a tenant, enforcing GSTIN uniqueness
    #[instrument(skip(self, new), fields(gstin = %new.gstin))]
    pub async fn register(&self, new: NewTenant) -> Result<Tenant, TenantError> {
        let tenant = Tenant::create(new)?;
        if self.port.find_by_gstin(&tenant.gstin).await?.is_some() {
            return Err(TenantError::DuplicateGstin(tenant.gstin.to_string()));
        }
        self.port.insert_tenant(&tenant).await?;
        info!(tenant_id = %tenant.id, "Tenant registered");
        Ok(tenant)
    }

    pub async fn get(&self, id: TenantId) -> Result<Tenant, TenantError> {
        Ok(self.port.get_tenant(id).await?)
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, TenantError> {
        Ok(self.port.list_tenants().await?)
    }

    /// Fails with `NotFound` unless the tenant exists
    pub async fn ensure_exists(&self, id: TenantId) -> Result<(), TenantError> {
        if self.port.tenant_exists(id).await? {
            Ok(())
        } else {
            Err(TenantError::not_found(id))
        }
    }
}
