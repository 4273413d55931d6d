//! Chart of accounts DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use core_kernel::TenantId;
use domain_ledger::{AccountType, NewAccount};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub tenant_id: TenantId,
    #[validate(length(min = 1, max = 20))]
    pub account_code: String,
    #[validate(length(min = 1, max = 255))]
    pub account_name: String,
    pub account_description: Option<String>,
    pub account_type: AccountType,
    #[validate(length(max = 50))]
    pub account_subtype: Option<String>,
    pub gst_applicable: Option<bool>,
    pub default_gst_rate: Option<Decimal>,
    pub allow_manual_entries: Option<bool>,
    pub is_active: Option<bool>,
}

impl From<CreateAccountRequest> for NewAccount {
    fn from(req: CreateAccountRequest) -> Self {
        NewAccount {
            account_description: req.account_description,
            account_subtype: req.account_subtype,
            gst_applicable: req.gst_applicable,
            default_gst_rate: req.default_gst_rate,
            allow_manual_entries: req.allow_manual_entries,
            is_active: req.is_active,
            ..NewAccount::new(req.tenant_id, req.account_code, req.account_name, req.account_type)
        }
    }
}
