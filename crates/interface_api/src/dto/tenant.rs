//! Tenant DTOs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use core_kernel::{Currency, Timezone};
use domain_tenant::{BusinessType, NewTenant, ValuationMethod};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTenantRequest {
    #[validate(length(min = 1, max = 255))]
    pub business_name: String,
    pub business_type: Option<BusinessType>,
    pub business_category: Option<String>,
    #[validate(length(equal = 15))]
    pub gstin: String,
    #[validate(length(equal = 10))]
    pub pan: Option<String>,
    #[validate(length(equal = 21))]
    pub cin: Option<String>,
    pub address: Option<serde_json::Value>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    pub fiscal_year_start: Option<NaiveDate>,
    pub currency: Option<Currency>,
    #[validate(length(equal = 2))]
    pub country_code: Option<String>,
    pub timezone: Option<Timezone>,
    pub inventory_valuation_method: Option<ValuationMethod>,
    pub reorder_threshold: Option<Decimal>,
    pub is_active: Option<bool>,
}

impl From<CreateTenantRequest> for NewTenant {
    fn from(req: CreateTenantRequest) -> Self {
        NewTenant {
            business_name: req.business_name,
            business_type: req.business_type,
            business_category: req.business_category,
            gstin: req.gstin,
            pan: req.pan,
            cin: req.cin,
            address: req.address,
            phone: req.phone,
            email: req.email,
            website: req.website,
            fiscal_year_start: req.fiscal_year_start,
            currency: req.currency,
            country_code: req.country_code,
            timezone: req.timezone,
            inventory_valuation_method: req.inventory_valuation_method,
            reorder_threshold: req.reorder_threshold,
            is_active: req.is_active,
        }
    }
}
