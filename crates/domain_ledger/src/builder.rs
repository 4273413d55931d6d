//! Journal Builder
//!
//! Collects proposed debit and credit lines and turns them into a DRAFT
//! [`JournalEntry`] once every line passes its checks.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use core_kernel::money::positive_ledger_amount;
use core_kernel::{AccountId, TenantId};

use crate::account::PostingType;
use crate::error::LedgerError;
use crate::journal::{JournalEntry, JournalLine};
use crate::registry::AccountRegistry;

/// A debit or credit line as submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposedPosting {
    pub account_id: AccountId,
    pub posting_type: PostingType,
    pub amount: Decimal,
    pub line_description: Option<String>,
}

impl ProposedPosting {
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            posting_type: PostingType::Debit,
            amount,
            line_description: None,
        }
    }

    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            posting_type: PostingType::Credit,
            amount,
            line_description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.line_description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct JournalBuilder {
    tenant_id: TenantId,
    entry_number: String,
    description: String,
    entry_date: Option<NaiveDate>,
    lines: Vec<ProposedPosting>,
}

impl JournalBuilder {
    pub fn new(
        tenant_id: TenantId,
        entry_number: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id,
            entry_number: entry_number.into(),
            description: description.into(),
            entry_date: None,
            lines: Vec::new(),
        }
    }

    /// Sets the accounting date; defaults to today in the tenant's timezone
    pub fn dated(mut self, date: NaiveDate) -> Self {
        self.entry_date = Some(date);
        self
    }

    pub fn debit(self, account_id: AccountId, amount: Decimal) -> Self {
        self.line(ProposedPosting::debit(account_id, amount))
    }

    pub fn credit(self, account_id: AccountId, amount: Decimal) -> Self {
        self.line(ProposedPosting::credit(account_id, amount))
    }

    pub fn line(mut self, line: ProposedPosting) -> Self {
        self.lines.push(line);
        self
    }

    pub fn lines(mut self, lines: impl IntoIterator<Item = ProposedPosting>) -> Self {
        self.lines.extend(lines);
        self
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Checks every line and produces a DRAFT entry
    ///
    /// Lines are numbered from 1 in submission order. Balance is not
    /// checked here; that is the validate step.
    pub async fn build(self, registry: &AccountRegistry) -> Result<JournalEntry, LedgerError> {
        let entry_number = self.entry_number.trim().to_string();
        if entry_number.is_empty() {
            return Err(LedgerError::validation("entryNumber is required"));
        }
        let description = self.description.trim().to_string();
        if description.is_empty() {
            return Err(LedgerError::validation("description is required"));
        }
        if self.lines.is_empty() {
            return Err(LedgerError::validation("a journal entry needs at least one line"));
        }

        let tenant = registry.tenant(self.tenant_id).await?;

        let mut lines = Vec::with_capacity(self.lines.len());
        for (index, proposed) in self.lines.into_iter().enumerate() {
            let line_number = index as u32 + 1;
            let amount = positive_ledger_amount(proposed.amount).map_err(|e| {
                LedgerError::validation(format!("line {}: {}", line_number, e))
            })?;
            registry
                .resolve_postable(self.tenant_id, proposed.account_id)
                .await
                .map_err(|e| match e {
                    LedgerError::Validation(msg) => {
                        LedgerError::validation(format!("line {}: {}", line_number, msg))
                    }
                    other => other,
                })?;
            lines.push(JournalLine {
                line_number,
                account_id: proposed.account_id,
                posting_type: proposed.posting_type,
                amount,
                line_description: proposed.line_description,
            });
        }

        let entry_date = self.entry_date.unwrap_or_else(|| tenant.today());
        JournalEntry::draft(self.tenant_id, entry_number, entry_date, description, lines)
    }
}
