//! Tenant aggregate

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::{Currency, DateRange, TenantId, Timezone};

use crate::error::TenantError;
use crate::gstin::Gstin;

/// Line of business a tenant operates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BusinessType {
    Retailer,
    Wholesaler,
    Manufacturer,
    Distributor,
    ServiceProvider,
    Other,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Retailer => "RETAILER",
            BusinessType::Wholesaler => "WHOLESALER",
            BusinessType::Manufacturer => "MANUFACTURER",
            BusinessType::Distributor => "DISTRIBUTOR",
            BusinessType::ServiceProvider => "SERVICE_PROVIDER",
            BusinessType::Other => "OTHER",
        }
    }
}

impl std::str::FromStr for BusinessType {
    type Err = TenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RETAILER" => Ok(BusinessType::Retailer),
            "WHOLESALER" => Ok(BusinessType::Wholesaler),
            "MANUFACTURER" => Ok(BusinessType::Manufacturer),
            "DISTRIBUTOR" => Ok(BusinessType::Distributor),
            "SERVICE_PROVIDER" => Ok(BusinessType::ServiceProvider),
            "OTHER" => Ok(BusinessType::Other),
            other => Err(TenantError::invalid(format!("unknown business type {}", other))),
        }
    }
}

/// Inventory valuation method, recorded for the tenant but not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValuationMethod {
    Fifo,
    WeightedAverage,
    SpecificIdentification,
}

impl ValuationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValuationMethod::Fifo => "FIFO",
            ValuationMethod::WeightedAverage => "WEIGHTED_AVERAGE",
            ValuationMethod::SpecificIdentification => "SPECIFIC_IDENTIFICATION",
        }
    }
}

impl std::str::FromStr for ValuationMethod {
    type Err = TenantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FIFO" => Ok(ValuationMethod::Fifo),
            "WEIGHTED_AVERAGE" => Ok(ValuationMethod::WeightedAverage),
            "SPECIFIC_IDENTIFICATION" => Ok(ValuationMethod::SpecificIdentification),
            other => Err(TenantError::invalid(format!("unknown valuation method {}", other))),
        }
    }
}

/// A business unit owning its own books
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    #[serde(rename = "tenantId")]
    pub id: TenantId,
    pub business_name: String,
    pub business_type: BusinessType,
    pub business_category: Option<String>,
    pub gstin: Gstin,
    pub pan: Option<String>,
    pub cin: Option<String>,
    pub address: Option<serde_json::Value>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub fiscal_year_start: Option<NaiveDate>,
    pub currency: Currency,
    pub country_code: String,
    pub timezone: Timezone,
    pub inventory_valuation_method: Option<ValuationMethod>,
    pub reorder_threshold: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration data for a new tenant
///
/// Locale fields left as `None` take the service defaults: INR, `IN`,
/// `Asia/Kolkata`.
#[derive(Debug, Clone, Default)]
pub struct NewTenant {
    pub business_name: String,
    pub business_type: Option<BusinessType>,
    pub business_category: Option<String>,
    pub gstin: String,
    pub pan: Option<String>,
    pub cin: Option<String>,
    pub address: Option<serde_json::Value>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub fiscal_year_start: Option<NaiveDate>,
    pub currency: Option<Currency>,
    pub country_code: Option<String>,
    pub timezone: Option<Timezone>,
    pub inventory_valuation_method: Option<ValuationMethod>,
    pub reorder_threshold: Option<Decimal>,
    pub is_active: Option<bool>,
}

pub const DEFAULT_COUNTRY_CODE: &str = "IN";

impl Tenant {
    /// Validates registration data and builds the aggregate
    pub fn create(new: NewTenant) -> Result<Self, TenantError> {
        let business_name = new.business_name.trim().to_string();
        if business_name.is_empty() {
            return Err(TenantError::invalid("businessName is required"));
        }
        let business_type = new
            .business_type
            .ok_or_else(|| TenantError::invalid("businessType is required"))?;
        let gstin = Gstin::parse(&new.gstin)?;

        let country_code = new
            .country_code
            .map(|c| c.trim().to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string());
        if country_code.len() != 2 || !country_code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(TenantError::invalid(format!(
                "countryCode must be two letters, got {}",
                country_code
            )));
        }

        if let Some(pan) = new.pan.as_deref() {
            if pan.len() != 10 {
                return Err(TenantError::invalid("pan must be 10 characters"));
            }
        }
        if let Some(email) = new.email.as_deref() {
            if !email.contains('@') {
                return Err(TenantError::invalid(format!("invalid email {}", email)));
            }
        }
        if let Some(threshold) = new.reorder_threshold {
            if threshold < Decimal::ZERO {
                return Err(TenantError::invalid("reorderThreshold must not be negative"));
            }
        }

        let now = Utc::now();
        Ok(Self {
            id: TenantId::new_v7(),
            business_name,
            business_type,
            business_category: new.business_category,
            gstin,
            pan: new.pan,
            cin: new.cin,
            address: new.address,
            phone: new.phone,
            email: new.email,
            website: new.website,
            fiscal_year_start: new.fiscal_year_start,
            currency: new.currency.unwrap_or_default(),
            country_code,
            timezone: new.timezone.unwrap_or_default(),
            inventory_valuation_method: new.inventory_valuation_method,
            reorder_threshold: new.reorder_threshold,
            is_active: new.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        })
    }

    /// Current calendar date in the tenant's timezone
    pub fn today(&self) -> NaiveDate {
        self.timezone.today()
    }

    /// Fiscal year containing `date`
    ///
    /// Tenants without a configured start follow the Indian fiscal year,
    /// which begins on 1 April.
    pub fn fiscal_year(&self, date: NaiveDate) -> Result<DateRange, TenantError> {
        let start = match self.fiscal_year_start {
            Some(start) => start,
            None => NaiveDate::from_ymd_opt(date.year(), 4, 1)
                .ok_or_else(|| TenantError::invalid("date out of range"))?,
        };
        Ok(DateRange::fiscal_year_containing(start, date)?)
    }
}
