//! Custom Test Assertions
//!
//! Ledger-aware assertions with messages that name the offending values.

use rust_decimal::Decimal;

use domain_ledger::{JournalEntry, JournalStatus, ReconciliationReport, TrialBalance};

/// Asserts that two amounts are equal regardless of scale (`100` == `100.00`)
pub fn assert_amount_eq(actual: Decimal, expected: Decimal) {
    assert_eq!(
        actual.normalize(),
        expected.normalize(),
        "Amounts differ: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts that an entry's stored totals agree with its lines and balance
pub fn assert_entry_balanced(entry: &JournalEntry) {
    let debits: Decimal = entry
        .lines
        .iter()
        .filter(|l| l.posting_type == domain_ledger::PostingType::Debit)
        .map(|l| l.amount)
        .sum();
    let credits: Decimal = entry
        .lines
        .iter()
        .filter(|l| l.posting_type == domain_ledger::PostingType::Credit)
        .map(|l| l.amount)
        .sum();

    assert_amount_eq(entry.total_debit, debits);
    assert_amount_eq(entry.total_credit, credits);
    assert_eq!(
        debits, credits,
        "Journal {} is not balanced: debits={}, credits={}",
        entry.entry_number, debits, credits
    );
    assert!(entry.is_balanced, "Journal {} is not flagged balanced", entry.entry_number);
}

pub fn assert_status(entry: &JournalEntry, expected: JournalStatus) {
    assert_eq!(
        entry.status, expected,
        "Journal {} is {}, expected {}",
        entry.entry_number, entry.status, expected
    );
}

/// Asserts that debit and credit totals agree and the nets sum to zero
pub fn assert_trial_balance_nets_to_zero(trial_balance: &TrialBalance) {
    assert!(
        trial_balance.is_balanced,
        "Trial balance as of {} is not balanced: debit={}, credit={}",
        trial_balance.as_of,
        trial_balance.total_debit,
        trial_balance.total_credit
    );
    assert!(
        trial_balance.net_total().is_zero(),
        "Trial balance nets to {}, expected zero",
        trial_balance.net_total()
    );
}

pub fn assert_reconciled(report: &ReconciliationReport) {
    assert!(
        report.is_consistent && report.discrepancies.is_empty(),
        "Ledger for tenant {} has {} discrepancies: {:?}",
        report.tenant_id,
        report.discrepancies.len(),
        report.discrepancies
    );
}
