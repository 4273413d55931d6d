//! In-memory implementation of `TenantPort`
//!
//! Backs `storage = memory` deployments and the domain tests.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError, TenantId};

use crate::gstin::Gstin;
use crate::ports::TenantPort;
use crate::tenant::Tenant;

#[derive(Debug, Default, Clone)]
pub struct InMemoryTenantStore {
    tenants: Arc<RwLock<BTreeMap<TenantId, Tenant>>>,
}

impl InMemoryTenantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates the store
    pub async fn with_tenants(tenants: Vec<Tenant>) -> Self {
        let store = Self::new();
        {
            let mut map = store.tenants.write().await;
            for tenant in tenants {
                map.insert(tenant.id, tenant);
            }
        }
        store
    }
}

impl DomainPort for InMemoryTenantStore {}

#[async_trait]
impl HealthCheckable for InMemoryTenantStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-tenants", 0)
    }
}

#[async_trait]
impl TenantPort for InMemoryTenantStore {
    async fn insert_tenant(&self, tenant: &Tenant) -> Result<(), PortError> {
        let mut tenants = self.tenants.write().await;
        if tenants.values().any(|t| t.gstin == tenant.gstin) {
            return Err(PortError::conflict(format!(
                "GSTIN {} is already registered",
                tenant.gstin
            )));
        }
        tenants.insert(tenant.id, tenant.clone());
        Ok(())
    }

    async fn get_tenant(&self, id: TenantId) -> Result<Tenant, PortError> {
        self.tenants
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Tenant", id))
    }

    async fn find_by_gstin(&self, gstin: &Gstin) -> Result<Option<Tenant>, PortError> {
        Ok(self
            .tenants
            .read()
            .await
            .values()
            .find(|t| &t.gstin == gstin)
            .cloned())
    }

    async fn list_tenants(&self) -> Result<Vec<Tenant>, PortError> {
        Ok(self.tenants.read().await.values().cloned().collect())
    }
}
