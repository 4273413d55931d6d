//! Materialized ledger records
//!
//! Postings are the authoritative record of a posted journal entry. General
//! ledger rows and account balances are projections written in the same
//! commit.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use core_kernel::money::{checked_sum, ledger_amount};
use core_kernel::{AccountId, JournalEntryId, LedgerEntryId, MoneyError, PostingId, TenantId};

use crate::account::{AccountType, PostingType};
use crate::builder::ProposedPosting;
use crate::journal::{JournalEntry, JournalLine};

/// A single debit or credit written when an entry is posted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Posting {
    #[serde(rename = "postingId")]
    pub id: PostingId,
    pub tenant_id: TenantId,
    #[serde(rename = "journalId")]
    pub journal_id: JournalEntryId,
    pub account_id: AccountId,
    pub posting_type: PostingType,
    pub amount: Decimal,
    pub line_number: u32,
    pub line_description: Option<String>,
    /// Accounting date; the entry date of the journal
    pub posting_date: NaiveDate,
    /// Insertion order within the tenant, assigned by the store on commit
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

impl Posting {
    fn from_line(entry: &JournalEntry, line: &JournalLine, at: DateTime<Utc>) -> Self {
        Self {
            id: PostingId::new_v7(),
            tenant_id: entry.tenant_id,
            journal_id: entry.id,
            account_id: line.account_id,
            posting_type: line.posting_type,
            amount: line.amount,
            line_number: line.line_number,
            line_description: line.line_description.clone(),
            posting_date: entry.entry_date,
            sequence: 0,
            created_at: at,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct PostingKey {
    account_id: AccountId,
    posting_type: PostingType,
    amount: Decimal,
}

impl PostingKey {
    fn new(account_id: AccountId, posting_type: PostingType, amount: Decimal) -> Self {
        Self {
            account_id,
            posting_type,
            amount: amount.normalize(),
        }
    }
}

/// Multiset of (account, side, amount) triples
///
/// Two sets are equal when they hold the same triples the same number of
/// times, regardless of order or line numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingSet(BTreeMap<PostingKey, usize>);

impl PostingSet {
    fn insert(&mut self, key: PostingKey) {
        *self.0.entry(key).or_insert(0) += 1;
    }

    pub fn from_lines(lines: &[JournalLine]) -> Self {
        let mut set = Self::default();
        for line in lines {
            set.insert(PostingKey::new(line.account_id, line.posting_type, line.amount));
        }
        set
    }

    pub fn from_postings(postings: &[Posting]) -> Self {
        let mut set = Self::default();
        for posting in postings {
            set.insert(PostingKey::new(posting.account_id, posting.posting_type, posting.amount));
        }
        set
    }

    pub fn from_proposed(proposed: &[ProposedPosting]) -> Self {
        let mut set = Self::default();
        for p in proposed {
            set.insert(PostingKey::new(p.account_id, p.posting_type, p.amount));
        }
        set
    }

    /// Total number of triples, counting repeats
    pub fn len(&self) -> usize {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// General ledger row, one per posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneralLedgerEntry {
    #[serde(rename = "glId")]
    pub id: LedgerEntryId,
    pub tenant_id: TenantId,
    pub account_id: AccountId,
    #[serde(rename = "journalId")]
    pub journal_id: JournalEntryId,
    pub transaction_date: NaiveDate,
    pub posting_date: NaiveDate,
    pub entry_type: PostingType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub is_posted: bool,
    pub created_at: DateTime<Utc>,
}

impl GeneralLedgerEntry {
    fn project(entry: &JournalEntry, posting: &Posting, posting_date: NaiveDate) -> Self {
        Self {
            id: LedgerEntryId::new_v7(),
            tenant_id: posting.tenant_id,
            account_id: posting.account_id,
            journal_id: posting.journal_id,
            transaction_date: entry.entry_date,
            posting_date,
            entry_type: posting.posting_type,
            amount: posting.amount,
            description: posting
                .line_description
                .clone()
                .or_else(|| Some(entry.description.clone())),
            is_posted: true,
            created_at: posting.created_at,
        }
    }
}

/// Running totals of one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub tenant_id: TenantId,
    pub account_id: AccountId,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    /// Signed to the account's normal side
    pub balance: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl AccountBalance {
    pub fn zero(tenant_id: TenantId, account_id: AccountId) -> Self {
        Self {
            tenant_id,
            account_id,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: Decimal::ZERO,
            updated_at: Utc::now(),
        }
    }

    /// Adds a delta in place
    ///
    /// Totals that overflow or leave the ledger range are refused and the
    /// balance is left untouched.
    pub fn apply(&mut self, delta: &BalanceDelta, at: DateTime<Utc>) -> Result<(), MoneyError> {
        let debit_total = ledger_amount(checked_sum([self.debit_total, delta.debit])?)?;
        let credit_total = ledger_amount(checked_sum([self.credit_total, delta.credit])?)?;
        self.balance = delta.account_type.signed_balance(debit_total, credit_total);
        self.debit_total = debit_total;
        self.credit_total = credit_total;
        self.updated_at = at;
        Ok(())
    }
}

/// Change to one account's totals caused by a posting batch
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceDelta {
    pub account_id: AccountId,
    pub account_type: AccountType,
    pub debit: Decimal,
    pub credit: Decimal,
}

/// Everything one post commit writes, applied atomically by the store
///
/// `journal` already carries the POSTED status and bumped version; the
/// store must refuse the batch unless the stored version equals
/// `expected_version`.
#[derive(Debug, Clone)]
pub struct PostingBatch {
    pub journal: JournalEntry,
    pub expected_version: i64,
    pub postings: Vec<Posting>,
    pub ledger_entries: Vec<GeneralLedgerEntry>,
    pub balance_deltas: Vec<BalanceDelta>,
}

impl PostingBatch {
    /// Materializes `posted` (already transitioned to POSTED)
    ///
    /// `None` if `account_types` misses an account on the entry or a
    /// per-account total overflows.
    pub fn materialize(
        posted: JournalEntry,
        expected_version: i64,
        account_types: &BTreeMap<AccountId, AccountType>,
        posting_date: NaiveDate,
        at: DateTime<Utc>,
    ) -> Option<Self> {
        let postings: Vec<Posting> = posted
            .lines
            .iter()
            .map(|line| Posting::from_line(&posted, line, at))
            .collect();

        let ledger_entries = postings
            .iter()
            .map(|p| GeneralLedgerEntry::project(&posted, p, posting_date))
            .collect();

        let mut deltas: BTreeMap<AccountId, BalanceDelta> = BTreeMap::new();
        for posting in &postings {
            let account_type = *account_types.get(&posting.account_id)?;
            let delta = deltas.entry(posting.account_id).or_insert(BalanceDelta {
                account_id: posting.account_id,
                account_type,
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
            });
            match posting.posting_type {
                PostingType::Debit => delta.debit = delta.debit.checked_add(posting.amount)?,
                PostingType::Credit => delta.credit = delta.credit.checked_add(posting.amount)?,
            }
        }

        Some(Self {
            journal: posted,
            expected_version,
            postings,
            ledger_entries,
            balance_deltas: deltas.into_values().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(account_id: AccountId, posting_type: PostingType, amount: Decimal, n: u32) -> JournalLine {
        JournalLine {
            line_number: n,
            account_id,
            posting_type,
            amount,
            line_description: None,
        }
    }

    #[test]
    fn test_posting_set_ignores_order_and_scale() {
        let cash = AccountId::new();
        let revenue = AccountId::new();
        let a = PostingSet::from_lines(&[
            line(cash, PostingType::Debit, dec!(100.00), 1),
            line(revenue, PostingType::Credit, dec!(100.00), 2),
        ]);
        let b = PostingSet::from_lines(&[
            line(revenue, PostingType::Credit, dec!(100), 1),
            line(cash, PostingType::Debit, dec!(100.0), 2),
        ]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_posting_set_counts_duplicates() {
        let cash = AccountId::new();
        let revenue = AccountId::new();
        let once = PostingSet::from_lines(&[
            line(cash, PostingType::Debit, dec!(50.00), 1),
            line(revenue, PostingType::Credit, dec!(50.00), 2),
        ]);
        let twice = PostingSet::from_lines(&[
            line(cash, PostingType::Debit, dec!(50.00), 1),
            line(cash, PostingType::Debit, dec!(50.00), 2),
            line(revenue, PostingType::Credit, dec!(50.00), 3),
        ]);
        assert_ne!(once, twice);
    }

    #[test]
    fn test_posting_set_distinguishes_side() {
        let cash = AccountId::new();
        let a = PostingSet::from_lines(&[line(cash, PostingType::Debit, dec!(10), 1)]);
        let b = PostingSet::from_lines(&[line(cash, PostingType::Credit, dec!(10), 1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_account_balance_apply_signs_to_normal_side() {
        let tenant = TenantId::new();
        let account = AccountId::new();
        let mut balance = AccountBalance::zero(tenant, account);
        balance.apply(
            &BalanceDelta {
                account_id: account,
                account_type: AccountType::Revenue,
                debit: dec!(0),
                credit: dec!(250.00),
            },
            Utc::now(),
        )
        .unwrap();
        assert_eq!(balance.balance, dec!(250.00));
        assert_eq!(balance.credit_total, dec!(250.00));
    }

    #[test]
    fn test_account_balance_apply_refuses_overflow() {
        let tenant = TenantId::new();
        let account = AccountId::new();
        let mut balance = AccountBalance::zero(tenant, account);
        balance.debit_total = Decimal::MAX;
        let result = balance.apply(
            &BalanceDelta {
                account_id: account,
                account_type: AccountType::Asset,
                debit: dec!(1.00),
                credit: dec!(0),
            },
            Utc::now(),
        );
        assert_eq!(result, Err(MoneyError::Overflow));
        assert_eq!(balance.debit_total, Decimal::MAX);
        assert_eq!(balance.credit_total, Decimal::ZERO);
    }

    #[test]
    fn test_account_balance_apply_refuses_totals_past_ledger_range() {
        let tenant = TenantId::new();
        let account = AccountId::new();
        let mut balance = AccountBalance::zero(tenant, account);
        balance.credit_total = dec!(99999999999999950.00);
        let result = balance.apply(
            &BalanceDelta {
                account_id: account,
                account_type: AccountType::Revenue,
                debit: dec!(0),
                credit: dec!(100.00),
            },
            Utc::now(),
        );
        assert!(matches!(result, Err(MoneyError::OutOfRange { .. })));
        assert_eq!(balance.credit_total, dec!(99999999999999950.00));
    }
}
