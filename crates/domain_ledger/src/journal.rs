//! Journal entry aggregate and its status machine
//!
//! ```text
//! DRAFT ──validate──▶ VALIDATED ──post──▶ POSTED
//!   │
//!   └──reject──▶ REJECTED
//! ```
//!
//! POSTED and REJECTED are terminal. Status, totals and `isBalanced` are
//! only ever changed by the methods here.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::{AccountId, JournalEntryId, TenantId};

use crate::account::PostingType;
use crate::balance::line_totals;
use crate::error::LedgerError;
use crate::posting::PostingSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JournalStatus {
    Draft,
    Validated,
    Posted,
    Rejected,
}

impl JournalStatus {
    pub fn can_transition_to(&self, to: JournalStatus) -> bool {
        matches!(
            (self, to),
            (JournalStatus::Draft, JournalStatus::Validated)
                | (JournalStatus::Draft, JournalStatus::Rejected)
                | (JournalStatus::Validated, JournalStatus::Posted)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JournalStatus::Posted | JournalStatus::Rejected)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JournalStatus::Draft => "DRAFT",
            JournalStatus::Validated => "VALIDATED",
            JournalStatus::Posted => "POSTED",
            JournalStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for JournalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JournalStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DRAFT" => Ok(JournalStatus::Draft),
            "VALIDATED" => Ok(JournalStatus::Validated),
            "POSTED" => Ok(JournalStatus::Posted),
            "REJECTED" => Ok(JournalStatus::Rejected),
            other => Err(LedgerError::validation(format!("unknown journal status {}", other))),
        }
    }
}

/// One proposed debit or credit of a journal entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalLine {
    pub line_number: u32,
    pub account_id: AccountId,
    pub posting_type: PostingType,
    pub amount: Decimal,
    pub line_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    #[serde(rename = "journalId")]
    pub id: JournalEntryId,
    pub tenant_id: TenantId,
    pub entry_number: String,
    pub entry_date: NaiveDate,
    pub description: String,
    pub status: JournalStatus,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub is_balanced: bool,
    pub lines: Vec<JournalLine>,
    pub failure_reason: Option<String>,
    pub rejection_reason: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    /// Optimistic concurrency version, bumped on every stored change
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Builds a DRAFT entry; totals are computed from `lines`
    pub(crate) fn draft(
        tenant_id: TenantId,
        entry_number: String,
        entry_date: NaiveDate,
        description: String,
        lines: Vec<JournalLine>,
    ) -> Result<Self, LedgerError> {
        let (total_debit, total_credit) = line_totals(&lines)?;
        let now = Utc::now();
        Ok(Self {
            id: JournalEntryId::new_v7(),
            tenant_id,
            entry_number,
            entry_date,
            description,
            status: JournalStatus::Draft,
            total_debit,
            total_credit,
            is_balanced: false,
            lines,
            failure_reason: None,
            rejection_reason: None,
            posted_at: None,
            version: 1,
            created_at: now,
            updated_at: now,
        })
    }

    /// Lines as an order-free multiset
    pub fn posting_set(&self) -> PostingSet {
        PostingSet::from_lines(&self.lines)
    }

    /// Distinct accounts referenced by the lines
    pub fn account_ids(&self) -> Vec<AccountId> {
        let mut ids: Vec<_> = self.lines.iter().map(|l| l.account_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn transition(&mut self, to: JournalStatus) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(to) {
            return Err(LedgerError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.version += 1;
        self.updated_at = Utc::now();
    }

    /// DRAFT → VALIDATED, after the totals have been re-derived and checked
    pub(crate) fn mark_validated(
        &mut self,
        total_debit: Decimal,
        total_credit: Decimal,
    ) -> Result<(), LedgerError> {
        self.transition(JournalStatus::Validated)?;
        self.total_debit = total_debit;
        self.total_credit = total_credit;
        self.is_balanced = true;
        self.failure_reason = None;
        Ok(())
    }

    /// DRAFT → REJECTED
    pub(crate) fn reject(&mut self, reason: String) -> Result<(), LedgerError> {
        self.transition(JournalStatus::Rejected)?;
        self.rejection_reason = Some(reason);
        Ok(())
    }

    /// VALIDATED → POSTED
    pub(crate) fn mark_posted(&mut self, at: DateTime<Utc>) -> Result<(), LedgerError> {
        self.transition(JournalStatus::Posted)?;
        self.posted_at = Some(at);
        self.failure_reason = None;
        Ok(())
    }

    /// Records why a post attempt failed; status is unchanged
    pub(crate) fn record_failure(&mut self, reason: String) {
        self.failure_reason = Some(reason);
        self.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry() -> JournalEntry {
        let lines = vec![
            JournalLine {
                line_number: 1,
                account_id: AccountId::new(),
                posting_type: PostingType::Debit,
                amount: dec!(100.00),
                line_description: None,
            },
            JournalLine {
                line_number: 2,
                account_id: AccountId::new(),
                posting_type: PostingType::Credit,
                amount: dec!(100.00),
                line_description: None,
            },
        ];
        JournalEntry::draft(
            TenantId::new(),
            "JV-1".to_string(),
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            "Opening".to_string(),
            lines,
        )
        .unwrap()
    }

    #[test]
    fn test_draft_totals_computed() {
        let entry = entry();
        assert_eq!(entry.total_debit, dec!(100.00));
        assert_eq!(entry.total_credit, dec!(100.00));
        assert!(!entry.is_balanced);
        assert_eq!(entry.status, JournalStatus::Draft);
        assert_eq!(entry.version, 1);
    }

    #[test]
    fn test_valid_transitions() {
        assert!(JournalStatus::Draft.can_transition_to(JournalStatus::Validated));
        assert!(JournalStatus::Draft.can_transition_to(JournalStatus::Rejected));
        assert!(JournalStatus::Validated.can_transition_to(JournalStatus::Posted));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!JournalStatus::Draft.can_transition_to(JournalStatus::Posted));
        assert!(!JournalStatus::Validated.can_transition_to(JournalStatus::Rejected));
        assert!(!JournalStatus::Posted.can_transition_to(JournalStatus::Draft));
        assert!(!JournalStatus::Rejected.can_transition_to(JournalStatus::Validated));
    }

    #[test]
    fn test_post_from_draft_is_rejected() {
        let mut entry = entry();
        let err = entry.mark_posted(Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidTransition {
                from: JournalStatus::Draft,
                to: JournalStatus::Posted
            }
        ));
        assert_eq!(entry.version, 1);
    }

    #[test]
    fn test_full_lifecycle_bumps_version() {
        let mut entry = entry();
        entry.mark_validated(dec!(100.00), dec!(100.00)).unwrap();
        assert!(entry.is_balanced);
        entry.mark_posted(Utc::now()).unwrap();
        assert_eq!(entry.status, JournalStatus::Posted);
        assert!(entry.posted_at.is_some());
        assert_eq!(entry.version, 3);
    }

    #[test]
    fn test_record_failure_keeps_status() {
        let mut entry = entry();
        entry.mark_validated(dec!(100.00), dec!(100.00)).unwrap();
        entry.record_failure("account archived".to_string());
        assert_eq!(entry.status, JournalStatus::Validated);
        assert_eq!(entry.failure_reason.as_deref(), Some("account archived"));
    }

    #[test]
    fn test_status_serializes_screaming() {
        assert_eq!(serde_json::to_string(&JournalStatus::Validated).unwrap(), "\"VALIDATED\"");
    }
}
