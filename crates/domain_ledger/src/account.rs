//! Chart of accounts
//!
//! An account belongs to exactly one tenant and is identified within it by
//! its account code.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AccountId, Rate, TenantId};

use crate::error::LedgerError;

/// Types of accounts in the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    /// Asset accounts (debit normal balance)
    Asset,
    /// Liability accounts (credit normal balance)
    Liability,
    /// Equity accounts (credit normal balance)
    Equity,
    /// Revenue accounts (credit normal balance)
    Revenue,
    /// Expense accounts (debit normal balance)
    Expense,
}

impl AccountType {
    /// Returns true if this account type has a debit normal balance
    pub fn is_debit_normal(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Expense)
    }

    /// The side that increases the balance
    pub fn normal_side(&self) -> PostingType {
        if self.is_debit_normal() {
            PostingType::Debit
        } else {
            PostingType::Credit
        }
    }

    /// Balance movement for a debit and credit pair, signed to the normal side
    pub fn signed_balance(&self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_normal() {
            debit - credit
        } else {
            credit - debit
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Asset => "ASSET",
            AccountType::Liability => "LIABILITY",
            AccountType::Equity => "EQUITY",
            AccountType::Revenue => "REVENUE",
            AccountType::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASSET" => Ok(AccountType::Asset),
            "LIABILITY" => Ok(AccountType::Liability),
            "EQUITY" => Ok(AccountType::Equity),
            "REVENUE" => Ok(AccountType::Revenue),
            "EXPENSE" => Ok(AccountType::Expense),
            other => Err(LedgerError::validation(format!("unknown account type {}", other))),
        }
    }
}

/// Type of posting (debit or credit)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostingType {
    Debit,
    Credit,
}

impl PostingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostingType::Debit => "DEBIT",
            PostingType::Credit => "CREDIT",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            PostingType::Debit => PostingType::Credit,
            PostingType::Credit => PostingType::Debit,
        }
    }
}

impl fmt::Display for PostingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostingType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBIT" => Ok(PostingType::Debit),
            "CREDIT" => Ok(PostingType::Credit),
            other => Err(LedgerError::validation(format!("unknown posting type {}", other))),
        }
    }
}

/// An account in a tenant's chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "accountId")]
    pub id: AccountId,
    pub tenant_id: TenantId,
    pub account_code: String,
    pub account_name: String,
    pub account_description: Option<String>,
    pub account_type: AccountType,
    pub account_subtype: Option<String>,
    pub gst_applicable: bool,
    pub default_gst_rate: Option<Decimal>,
    pub allow_manual_entries: bool,
    pub is_active: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Validates a registration and builds the account
    pub fn create(new: NewAccount) -> Result<Self, LedgerError> {
        let account_code = new.account_code.trim().to_string();
        if account_code.is_empty() {
            return Err(LedgerError::validation("accountCode is required"));
        }
        let account_name = new.account_name.trim().to_string();
        if account_name.is_empty() {
            return Err(LedgerError::validation("accountName is required"));
        }
        if let Some(rate) = new.default_gst_rate {
            Rate::from_percentage(rate)?;
        }

        let now = Utc::now();
        Ok(Self {
            id: AccountId::new_v7(),
            tenant_id: new.tenant_id,
            account_code,
            account_name,
            account_description: new.account_description,
            account_type: new.account_type,
            account_subtype: new.account_subtype,
            gst_applicable: new.gst_applicable.unwrap_or(false),
            default_gst_rate: new.default_gst_rate,
            allow_manual_entries: new.allow_manual_entries.unwrap_or(true),
            is_active: new.is_active.unwrap_or(true),
            archived_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// True if journal lines may be posted to this account
    pub fn is_postable(&self) -> bool {
        self.is_active && self.archived_at.is_none() && self.allow_manual_entries
    }

    /// Why the account refuses postings, if it does
    pub fn posting_refusal(&self) -> Option<&'static str> {
        if self.archived_at.is_some() {
            Some("is archived")
        } else if !self.is_active {
            Some("is inactive")
        } else if !self.allow_manual_entries {
            Some("does not allow manual entries")
        } else {
            None
        }
    }

    /// Archives the account; it stays resolvable but no longer postable
    pub fn archive(&mut self, at: DateTime<Utc>) {
        self.archived_at = Some(at);
        self.is_active = false;
        self.updated_at = at;
    }
}

/// Registration data for a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub tenant_id: TenantId,
    pub account_code: String,
    pub account_name: String,
    pub account_description: Option<String>,
    pub account_type: AccountType,
    pub account_subtype: Option<String>,
    pub gst_applicable: Option<bool>,
    pub default_gst_rate: Option<Decimal>,
    pub allow_manual_entries: Option<bool>,
    pub is_active: Option<bool>,
}

impl NewAccount {
    pub fn new(
        tenant_id: TenantId,
        code: impl Into<String>,
        name: impl Into<String>,
        account_type: AccountType,
    ) -> Self {
        Self {
            tenant_id,
            account_code: code.into(),
            account_name: name.into(),
            account_description: None,
            account_type,
            account_subtype: None,
            gst_applicable: None,
            default_gst_rate: None,
            allow_manual_entries: None,
            is_active: None,
        }
    }

    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.account_subtype = Some(subtype.into());
        self
    }

    pub fn with_gst_rate(mut self, rate: Decimal) -> Self {
        self.gst_applicable = Some(true);
        self.default_gst_rate = Some(rate);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.account_description = Some(description.into());
        self
    }
}

/// Starter chart of accounts for a small Indian trading business
pub struct StandardChart;

impl StandardChart {
    pub fn accounts(tenant_id: TenantId) -> Vec<NewAccount> {
        use rust_decimal_macros::dec;

        vec![
            // Assets
            NewAccount::new(tenant_id, "1000", "Cash in Hand", AccountType::Asset)
                .with_subtype("CURRENT_ASSET"),
            NewAccount::new(tenant_id, "1010", "Bank Account", AccountType::Asset)
                .with_subtype("CURRENT_ASSET"),
            NewAccount::new(tenant_id, "1100", "Accounts Receivable", AccountType::Asset)
                .with_subtype("CURRENT_ASSET"),
            NewAccount::new(tenant_id, "1200", "Inventory", AccountType::Asset)
                .with_subtype("CURRENT_ASSET"),
            NewAccount::new(tenant_id, "1300", "GST Input Credit", AccountType::Asset)
                .with_subtype("TAX"),

            // Liabilities
            NewAccount::new(tenant_id, "2000", "Accounts Payable", AccountType::Liability)
                .with_subtype("CURRENT_LIABILITY"),
            NewAccount::new(tenant_id, "2100", "CGST Payable", AccountType::Liability)
                .with_subtype("TAX"),
            NewAccount::new(tenant_id, "2110", "SGST Payable", AccountType::Liability)
                .with_subtype("TAX"),
            NewAccount::new(tenant_id, "2120", "IGST Payable", AccountType::Liability)
                .with_subtype("TAX"),

            // Equity
            NewAccount::new(tenant_id, "3000", "Owner's Capital", AccountType::Equity),
            NewAccount::new(tenant_id, "3100", "Retained Earnings", AccountType::Equity),

            // Revenue
            NewAccount::new(tenant_id, "4000", "Sales Revenue", AccountType::Revenue)
                .with_gst_rate(dec!(18)),
            NewAccount::new(tenant_id, "4100", "Other Income", AccountType::Revenue),

            // Expenses
            NewAccount::new(tenant_id, "5000", "Cost of Goods Sold", AccountType::Expense),
            NewAccount::new(tenant_id, "5100", "Rent", AccountType::Expense)
                .with_gst_rate(dec!(18)),
            NewAccount::new(tenant_id, "5200", "Salaries", AccountType::Expense),
        ]
    }
}
