//! Request and query DTOs
//!
//! Responses are the domain records themselves, which already serialize
//! with camelCase field names.

pub mod tenant;
pub mod account;
pub mod journal;
pub mod invoice;
pub mod inventory;

use chrono::NaiveDate;
use serde::Deserialize;

use core_kernel::{TenantId, TenantScope};

/// Optional `?tenantId=` filter on list endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantFilter {
    pub tenant_id: Option<TenantId>,
}

impl TenantFilter {
    pub fn scope(&self) -> TenantScope {
        TenantScope::from_filter(self.tenant_id)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsOfQuery {
    pub as_of: Option<NaiveDate>,
}

/// Query of the tenant-bound report endpoints; `tenantId` is required
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub tenant_id: TenantId,
    pub as_of: Option<NaiveDate>,
}
