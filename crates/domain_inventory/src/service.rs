//! Inventory application service

use std::sync::Arc;
use tracing::{info, instrument, warn};

use core_kernel::{ProductId, TenantId, TenantScope};
use domain_tenant::TenantPort;

use crate::balance::InventoryBalance;
use crate::error::InventoryError;
use crate::movement::{InventoryMovement, NewMovement};
use crate::ports::InventoryPort;

#[derive(Clone)]
pub struct InventoryService {
    port: Arc<dyn InventoryPort>,
    tenants: Arc<dyn TenantPort>,
}

impl InventoryService {
    pub fn new(port: Arc<dyn InventoryPort>, tenants: Arc<dyn TenantPort>) -> Self {
        Self { port, tenants }
    }

    /// Records a movement and returns it with the updated balance
    #[instrument(skip(self, new), fields(tenant_id = %new.tenant_id, product_id = %new.product_id))]
    pub async fn record(
        &self,
        new: NewMovement,
    ) -> Result<(InventoryMovement, InventoryBalance), InventoryError> {
        let tenant = self.tenants.get_tenant(new.tenant_id).await.map_err(|e| {
            if e.is_not_found() {
                InventoryError::TenantNotFound(new.tenant_id.to_string())
            } else {
                InventoryError::from(e)
            }
        })?;

        let movement = InventoryMovement::create(new)?;
        let balance = self.port.record_movement(&movement).await?;

        info!(
            movement_id = %movement.id,
            transaction_type = %movement.transaction_type,
            on_hand = balance.current_quantity,
            "Stock movement recorded"
        );
        if let Some(threshold) = tenant.reorder_threshold {
            if balance.is_at_or_below(threshold) {
                warn!(on_hand = balance.current_quantity, %threshold, "Stock at or below reorder threshold");
            }
        }
        Ok((movement, balance))
    }

    pub async fn balance(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<InventoryBalance>, InventoryError> {
        Ok(self.port.get_balance(tenant_id, product_id).await?)
    }

    pub async fn balances(&self, scope: TenantScope) -> Result<Vec<InventoryBalance>, InventoryError> {
        Ok(self.port.list_balances(scope).await?)
    }

    pub async fn movements(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<InventoryMovement>, InventoryError> {
        Ok(self.port.list_movements(scope).await?)
    }
}
