//! Inventory Domain Ports

use async_trait::async_trait;

use core_kernel::{DomainPort, HealthCheckable, PortError, ProductId, TenantId, TenantScope};

use crate::balance::InventoryBalance;
use crate::movement::InventoryMovement;

#[async_trait]
pub trait InventoryPort: DomainPort + HealthCheckable {
    /// Stores the movement and the product balance it produces in one unit
    ///
    /// The adapter loads the current balance (or an opening one), applies the
    /// movement with [`InventoryBalance::apply`] and persists both, or
    /// neither. A movement that would take stock below zero fails with
    /// `PortError::Validation`.
    async fn record_movement(
        &self,
        movement: &InventoryMovement,
    ) -> Result<InventoryBalance, PortError>;

    async fn get_balance(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<InventoryBalance>, PortError>;

    async fn list_balances(&self, scope: TenantScope) -> Result<Vec<InventoryBalance>, PortError>;

    /// Movements in the scope, oldest first
    async fn list_movements(&self, scope: TenantScope)
        -> Result<Vec<InventoryMovement>, PortError>;
}
