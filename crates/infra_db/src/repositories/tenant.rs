//! Tenant repository

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use core_kernel::{Currency, TenantId, Timezone};
use domain_tenant::{BusinessType, Gstin, Tenant, ValuationMethod};

use super::parse_column;
use crate::error::DatabaseError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TenantRow {
    pub tenant_id: Uuid,
    pub business_name: String,
    pub business_type: String,
    pub business_category: Option<String>,
    pub gstin: String,
    pub pan: Option<String>,
    pub cin: Option<String>,
    pub address: Option<serde_json::Value>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub fiscal_year_start: Option<NaiveDate>,
    pub currency: String,
    pub country_code: String,
    pub timezone: String,
    pub inventory_valuation_method: Option<String>,
    pub reorder_threshold: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TenantRow> for Tenant {
    type Error = DatabaseError;

    fn try_from(row: TenantRow) -> Result<Self, Self::Error> {
        Ok(Tenant {
            id: TenantId::from_uuid(row.tenant_id),
            business_name: row.business_name,
            business_type: parse_column::<BusinessType>("business_type", &row.business_type)?,
            business_category: row.business_category,
            gstin: Gstin::parse(&row.gstin).map_err(DatabaseError::decode)?,
            pan: row.pan,
            cin: row.cin,
            address: row.address,
            phone: row.phone,
            email: row.email,
            website: row.website,
            fiscal_year_start: row.fiscal_year_start,
            currency: parse_column::<Currency>("currency", &row.currency)?,
            country_code: row.country_code,
            timezone: parse_column::<Timezone>("timezone", &row.timezone)?,
            inventory_valuation_method: row
                .inventory_valuation_method
                .as_deref()
                .map(|v| parse_column::<ValuationMethod>("inventory_valuation_method", v))
                .transpose()?,
            reorder_threshold: row.reorder_threshold,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const SELECT_TENANT: &str = r#"
    SELECT tenant_id, business_name, business_type, business_category, gstin, pan, cin,
           address, phone, email, website, fiscal_year_start, currency, country_code,
           timezone, inventory_valuation_method, reorder_threshold, is_active,
           created_at, updated_at
    FROM tenants
"#;

#[derive(Debug, Clone)]
pub struct TenantRepository {
    pool: PgPool,
}

impl TenantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a tenant; a taken GSTIN surfaces as `DuplicateEntry`
    pub async fn insert(&self, tenant: &Tenant) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO tenants (
                tenant_id, business_name, business_type, business_category, gstin, pan, cin,
                address, phone, email, website, fiscal_year_start, currency, country_code,
                timezone, inventory_valuation_method, reorder_threshold, is_active,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(Uuid::from(tenant.id))
        .bind(&tenant.business_name)
        .bind(tenant.business_type.as_str())
        .bind(&tenant.business_category)
        .bind(tenant.gstin.as_str())
        .bind(&tenant.pan)
        .bind(&tenant.cin)
        .bind(&tenant.address)
        .bind(&tenant.phone)
        .bind(&tenant.email)
        .bind(&tenant.website)
        .bind(tenant.fiscal_year_start)
        .bind(tenant.currency.code())
        .bind(&tenant.country_code)
        .bind(tenant.timezone.name())
        .bind(tenant.inventory_valuation_method.map(|m| m.as_str()))
        .bind(tenant.reorder_threshold)
        .bind(tenant.is_active)
        .bind(tenant.created_at)
        .bind(tenant.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn get(&self, id: TenantId) -> Result<Tenant, DatabaseError> {
        let sql = format!("{} WHERE tenant_id = $1", SELECT_TENANT);
        sqlx::query_as::<_, TenantRow>(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Tenant", id))?
            .try_into()
    }

    pub async fn find_by_gstin(&self, gstin: &Gstin) -> Result<Option<Tenant>, DatabaseError> {
        let sql = format!("{} WHERE gstin = $1", SELECT_TENANT);
        sqlx::query_as::<_, TenantRow>(&sql)
            .bind(gstin.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(Tenant::try_from)
            .transpose()
    }

    pub async fn list(&self) -> Result<Vec<Tenant>, DatabaseError> {
        let sql = format!("{} ORDER BY created_at, tenant_id", SELECT_TENANT);
        sqlx::query_as::<_, TenantRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Tenant::try_from)
            .collect()
    }
}
