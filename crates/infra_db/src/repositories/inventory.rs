//! Inventory repository
//!
//! A movement and the balance it produces are written in one transaction,
//! with the balance row locked while the movement is applied.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{InventoryBalanceId, InventoryMovementId, ProductId, TenantId, TenantScope};
use domain_inventory::{InventoryBalance, InventoryMovement, TransactionType};

use super::{parse_column, scope_param, signed_column, unsigned_column};
use crate::error::DatabaseError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryBalanceRow {
    pub balance_id: Uuid,
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    pub current_quantity: i64,
    pub available_quantity: i64,
    pub reserved_quantity: i64,
    pub total_value: Decimal,
    pub average_cost: Decimal,
    pub last_movement_date: Option<DateTime<Utc>>,
    pub next_reorder_date: Option<NaiveDate>,
    pub last_updated: DateTime<Utc>,
}

impl From<InventoryBalanceRow> for InventoryBalance {
    fn from(row: InventoryBalanceRow) -> Self {
        InventoryBalance {
            id: InventoryBalanceId::from_uuid(row.balance_id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            product_id: ProductId::from_uuid(row.product_id),
            current_quantity: row.current_quantity,
            available_quantity: row.available_quantity,
            reserved_quantity: row.reserved_quantity,
            total_value: row.total_value,
            average_cost: row.average_cost,
            last_movement_date: row.last_movement_date,
            next_reorder_date: row.next_reorder_date,
            last_updated: row.last_updated,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InventoryMovementRow {
    pub ledger_id: Uuid,
    pub tenant_id: Uuid,
    pub product_id: Uuid,
    pub transaction_date: DateTime<Utc>,
    pub transaction_type: String,
    pub quantity_in: i32,
    pub quantity_out: i32,
    pub unit_cost: Option<Decimal>,
    pub batch_number: Option<String>,
    pub expiry_date: Option<NaiveDate>,
    pub reference_id: Option<String>,
    pub reference_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<InventoryMovementRow> for InventoryMovement {
    type Error = DatabaseError;

    fn try_from(row: InventoryMovementRow) -> Result<Self, Self::Error> {
        Ok(InventoryMovement {
            id: InventoryMovementId::from_uuid(row.ledger_id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            product_id: ProductId::from_uuid(row.product_id),
            transaction_date: row.transaction_date,
            transaction_type: parse_column::<TransactionType>(
                "transaction_type",
                &row.transaction_type,
            )?,
            quantity_in: unsigned_column("quantity_in", row.quantity_in)?,
            quantity_out: unsigned_column("quantity_out", row.quantity_out)?,
            unit_cost: row.unit_cost,
            batch_number: row.batch_number,
            expiry_date: row.expiry_date,
            reference_id: row.reference_id,
            reference_type: row.reference_type,
            created_at: row.created_at,
        })
    }
}

const SELECT_BALANCE: &str = r#"
    SELECT balance_id, tenant_id, product_id, current_quantity, available_quantity,
           reserved_quantity, total_value, average_cost, last_movement_date,
           next_reorder_date, last_updated
    FROM inventory_balance
"#;

#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies a movement to its product balance and stores both
    ///
    /// A refused movement (not enough stock) rolls the transaction back and
    /// surfaces as `ConstraintViolation`.
    pub async fn record_movement(
        &self,
        movement: &InventoryMovement,
    ) -> Result<InventoryBalance, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Make sure a row exists so it can be locked.
        let opening = InventoryBalance::opening(movement.tenant_id, movement.product_id);
        sqlx::query(
            r#"
            INSERT INTO inventory_balance (balance_id, tenant_id, product_id, last_updated)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (tenant_id, product_id) DO NOTHING
            "#,
        )
        .bind(Uuid::from(opening.id))
        .bind(Uuid::from(movement.tenant_id))
        .bind(Uuid::from(movement.product_id))
        .bind(opening.last_updated)
        .execute(&mut *tx)
        .await?;

        let sql = format!("{} WHERE tenant_id = $1 AND product_id = $2 FOR UPDATE", SELECT_BALANCE);
        let mut balance: InventoryBalance = sqlx::query_as::<_, InventoryBalanceRow>(&sql)
            .bind(Uuid::from(movement.tenant_id))
            .bind(Uuid::from(movement.product_id))
            .fetch_one(&mut *tx)
            .await?
            .into();

        if let Err(refused) = balance.apply(movement) {
            tx.rollback().await?;
            return Err(DatabaseError::ConstraintViolation(refused.to_string()));
        }

        sqlx::query(
            r#"
            INSERT INTO inventory_ledger (
                ledger_id, tenant_id, product_id, transaction_date, transaction_type,
                quantity_in, quantity_out, unit_cost, batch_number, expiry_date,
                reference_id, reference_type, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(Uuid::from(movement.id))
        .bind(Uuid::from(movement.tenant_id))
        .bind(Uuid::from(movement.product_id))
        .bind(movement.transaction_date)
        .bind(movement.transaction_type.as_str())
        .bind(signed_column("quantity_in", movement.quantity_in)?)
        .bind(signed_column("quantity_out", movement.quantity_out)?)
        .bind(movement.unit_cost)
        .bind(&movement.batch_number)
        .bind(movement.expiry_date)
        .bind(&movement.reference_id)
        .bind(&movement.reference_type)
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE inventory_balance
            SET current_quantity = $2, available_quantity = $3, reserved_quantity = $4,
                total_value = $5, average_cost = $6, last_movement_date = $7,
                next_reorder_date = $8, last_updated = $9
            WHERE balance_id = $1
            "#,
        )
        .bind(Uuid::from(balance.id))
        .bind(balance.current_quantity)
        .bind(balance.available_quantity)
        .bind(balance.reserved_quantity)
        .bind(balance.total_value)
        .bind(balance.average_cost)
        .bind(balance.last_movement_date)
        .bind(balance.next_reorder_date)
        .bind(balance.last_updated)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(balance)
    }

    pub async fn get_balance(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<InventoryBalance>, DatabaseError> {
        let sql = format!("{} WHERE tenant_id = $1 AND product_id = $2", SELECT_BALANCE);
        let row = sqlx::query_as::<_, InventoryBalanceRow>(&sql)
            .bind(Uuid::from(tenant_id))
            .bind(Uuid::from(product_id))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(InventoryBalance::from))
    }

    pub async fn list_balances(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<InventoryBalance>, DatabaseError> {
        let sql = format!(
            "{} WHERE ($1::uuid IS NULL OR tenant_id = $1) ORDER BY tenant_id, product_id",
            SELECT_BALANCE
        );
        let rows = sqlx::query_as::<_, InventoryBalanceRow>(&sql)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InventoryBalance::from).collect())
    }

    pub async fn list_movements(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<InventoryMovement>, DatabaseError> {
        sqlx::query_as::<_, InventoryMovementRow>(
            r#"
            SELECT ledger_id, tenant_id, product_id, transaction_date, transaction_type,
                   quantity_in, quantity_out, unit_cost, batch_number, expiry_date,
                   reference_id, reference_type, created_at
            FROM inventory_ledger
            WHERE ($1::uuid IS NULL OR tenant_id = $1)
            ORDER BY transaction_date, created_at
            "#,
        )
        .bind(scope_param(scope))
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(InventoryMovement::try_from)
        .collect()
    }
}
