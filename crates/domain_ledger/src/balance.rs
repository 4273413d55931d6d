//! Balance validation
//!
//! Pure functions over exact decimals. An entry balances when total debits
//! equal total credits; no tolerance is applied.

use rust_decimal::Decimal;

use core_kernel::money::{checked_sum, ledger_amount};

use crate::account::PostingType;
use crate::error::LedgerError;
use crate::journal::JournalLine;

/// Checks that debits equal credits
///
/// On mismatch the error carries `difference = total_debit - total_credit`,
/// so a credit-heavy entry reports a negative difference.
pub fn check_balance(total_debit: Decimal, total_credit: Decimal) -> Result<(), LedgerError> {
    let difference = total_debit
        .checked_sub(total_credit)
        .ok_or_else(|| LedgerError::validation("journal totals overflow"))?;
    if difference.is_zero() {
        Ok(())
    } else {
        Err(LedgerError::Unbalanced { difference })
    }
}

/// Sums the debit and credit sides of `lines`
///
/// Each side must stay within the ledger range.
pub fn line_totals(lines: &[JournalLine]) -> Result<(Decimal, Decimal), LedgerError> {
    let side = |posting_type: PostingType| {
        checked_sum(
            lines
                .iter()
                .filter(move |l| l.posting_type == posting_type)
                .map(|l| l.amount),
        )
    };
    let debit = ledger_amount(side(PostingType::Debit)?)?;
    let credit = ledger_amount(side(PostingType::Credit)?)?;
    Ok((debit, credit))
}
