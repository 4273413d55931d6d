//! Property-Based Test Generators
//!
//! Proptest strategies that respect domain invariants, and `fake`-backed
//! helpers for realistic names.

use chrono::{Duration, NaiveDate};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use proptest::prelude::*;
use rust_decimal::Decimal;

use domain_inventory::TransactionType;

/// Positive amounts with two fractional digits, 0.01 to 10,000,000.00
pub fn ledger_amount_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|minor| Decimal::new(minor, 2))
}

/// Amounts with three or more significant fractional digits
pub fn excess_precision_strategy() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64)
        .prop_filter("must not end in zero", |m| m % 10 != 0)
        .prop_map(|m| Decimal::new(m, 3))
}

pub fn transaction_type_strategy() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Purchase),
        Just(TransactionType::Sale),
        Just(TransactionType::Adjustment),
        Just(TransactionType::Return),
        Just(TransactionType::Transfer),
    ]
}

/// Balanced transfers between `account_count` accounts
///
/// Each element is `(debit index, credit index, amount)` with distinct
/// indices, so any sequence of them posts as balanced entries.
pub fn balanced_transfers_strategy(
    account_count: usize,
    max_transfers: usize,
) -> impl Strategy<Value = Vec<(usize, usize, Decimal)>> {
    let transfer = (0..account_count, 1..account_count, ledger_amount_strategy()).prop_map(
        move |(debit, offset, amount)| (debit, (debit + offset) % account_count, amount),
    );
    proptest::collection::vec(transfer, 1..=max_transfers)
}

/// Dates within the 2024-25 fiscal year
pub fn fiscal_date_strategy() -> impl Strategy<Value = NaiveDate> {
    (0i64..365i64).prop_map(|days| {
        NaiveDate::from_ymd_opt(2024, 4, 1).unwrap_or_default() + Duration::days(days)
    })
}

/// GSTINs that pass the format check
pub fn gstin_strategy() -> impl Strategy<Value = String> {
    "[0-3][0-9][A-Z]{5}[0-9]{4}[A-Z][1-9A-Z]Z[0-9A-Z]"
}

/// A plausible company name
pub fn business_name() -> String {
    CompanyName().fake()
}
