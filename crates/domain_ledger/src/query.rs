//! Ledger Query Layer
//!
//! Reports derived from postings alone. The materialized balances are only
//! consulted by [`LedgerQueries::reconcile`], which checks them and the
//! general ledger projection against the postings. Projection rows are also
//! served as stored.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{instrument, warn};

use core_kernel::money::checked_sum;
use core_kernel::{AccountId, JournalEntryId, LedgerEntryId, PostingId, TenantId, TenantScope};

use crate::account::{Account, AccountType, PostingType};
use crate::error::LedgerError;
use crate::ports::LedgerPort;
use crate::posting::{AccountBalance, GeneralLedgerEntry, Posting};
use crate::registry::AccountRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalanceLine {
    pub account_id: AccountId,
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    /// Debit minus credit
    pub net: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    pub tenant_id: TenantId,
    pub as_of: NaiveDate,
    pub lines: Vec<TrialBalanceLine>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub is_balanced: bool,
}

impl TrialBalance {
    /// Sum of every account's net; zero for a consistent ledger
    pub fn net_total(&self) -> Decimal {
        self.lines.iter().map(|l| l.net).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryLine {
    pub posting_id: PostingId,
    pub journal_id: JournalEntryId,
    pub posting_date: NaiveDate,
    pub sequence: i64,
    pub posting_type: PostingType,
    pub amount: Decimal,
    pub line_description: Option<String>,
    /// Balance after this posting, signed to the account's normal side
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHistory {
    pub account: Account,
    pub as_of: Option<NaiveDate>,
    pub lines: Vec<HistoryLine>,
    pub closing_balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancySource {
    AccountBalance,
    GeneralLedger,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discrepancy {
    pub account_id: AccountId,
    pub source: DiscrepancySource,
    pub recorded_debit: Decimal,
    pub recorded_credit: Decimal,
    pub derived_debit: Decimal,
    pub derived_credit: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationReport {
    pub tenant_id: TenantId,
    pub accounts_checked: usize,
    pub discrepancies: Vec<Discrepancy>,
    pub is_consistent: bool,
    pub checked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SideTotals {
    debit: Decimal,
    credit: Decimal,
}

impl SideTotals {
    fn add(&mut self, posting_type: PostingType, amount: Decimal) -> Result<(), LedgerError> {
        let side = match posting_type {
            PostingType::Debit => &mut self.debit,
            PostingType::Credit => &mut self.credit,
        };
        *side = checked_sum([*side, amount])?;
        Ok(())
    }
}

fn totals_by_account<I>(rows: I) -> Result<BTreeMap<AccountId, SideTotals>, LedgerError>
where
    I: IntoIterator<Item = (AccountId, PostingType, Decimal)>,
{
    let mut totals: BTreeMap<AccountId, SideTotals> = BTreeMap::new();
    for (account_id, posting_type, amount) in rows {
        totals.entry(account_id).or_default().add(posting_type, amount)?;
    }
    Ok(totals)
}

#[derive(Clone)]
pub struct LedgerQueries {
    port: Arc<dyn LedgerPort>,
    registry: AccountRegistry,
}

impl LedgerQueries {
    pub fn new(port: Arc<dyn LedgerPort>, registry: AccountRegistry) -> Self {
        Self { port, registry }
    }

    /// General ledger projection rows, as written by the posting engine
    pub async fn general_ledger(&self, scope: TenantScope) -> Result<Vec<GeneralLedgerEntry>, LedgerError> {
        Ok(self.port.list_general_ledger(scope).await?)
    }

    pub async fn ledger_entry(&self, id: LedgerEntryId) -> Result<GeneralLedgerEntry, LedgerError> {
        Ok(self.port.get_general_ledger(id).await?)
    }

    /// Trial balance over postings dated on or before `as_of`
    ///
    /// Accounts without postings are omitted. Lines are ordered by account
    /// code.
    #[instrument(skip(self))]
    pub async fn trial_balance(&self, tenant_id: TenantId, as_of: NaiveDate) -> Result<TrialBalance, LedgerError> {
        self.registry.tenant(tenant_id).await?;
        let postings = self.port.postings_for_tenant(tenant_id, Some(as_of)).await?;
        let totals = totals_by_account(
            postings.iter().map(|p| (p.account_id, p.posting_type, p.amount)),
        )?;

        let accounts: BTreeMap<AccountId, Account> = self
            .port
            .list_accounts(TenantScope::Tenant(tenant_id))
            .await?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let mut lines = Vec::with_capacity(totals.len());
        for (account_id, side) in totals {
            let account = accounts
                .get(&account_id)
                .ok_or_else(|| LedgerError::not_found("Account", account_id))?;
            lines.push(TrialBalanceLine {
                account_id,
                account_code: account.account_code.clone(),
                account_name: account.account_name.clone(),
                account_type: account.account_type,
                debit_total: side.debit,
                credit_total: side.credit,
                net: side.debit - side.credit,
            });
        }
        lines.sort_by(|a, b| a.account_code.cmp(&b.account_code));

        let total_debit = checked_sum(lines.iter().map(|l| l.debit_total))?;
        let total_credit = checked_sum(lines.iter().map(|l| l.credit_total))?;

        Ok(TrialBalance {
            tenant_id,
            as_of,
            lines,
            total_debit,
            total_credit,
            is_balanced: total_debit == total_credit,
        })
    }

    /// Postings of one account with a running balance
    #[instrument(skip(self))]
    pub async fn account_history(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<AccountHistory, LedgerError> {
        let account = self.registry.resolve(tenant_id, account_id).await?;
        let mut postings = self
            .port
            .postings_for_account(tenant_id, account_id, as_of)
            .await?;
        postings.sort_by_key(|p| (p.posting_date, p.sequence));

        let debit_normal = account.account_type.is_debit_normal();
        let mut running = Decimal::ZERO;
        let lines = postings
            .into_iter()
            .map(|p: Posting| {
                let increases = (p.posting_type == PostingType::Debit) == debit_normal;
                running = if increases { running + p.amount } else { running - p.amount };
                HistoryLine {
                    posting_id: p.id,
                    journal_id: p.journal_id,
                    posting_date: p.posting_date,
                    sequence: p.sequence,
                    posting_type: p.posting_type,
                    amount: p.amount,
                    line_description: p.line_description,
                    running_balance: running,
                }
            })
            .collect();

        Ok(AccountHistory {
            account,
            as_of,
            lines,
            closing_balance: running,
        })
    }

    /// Materialized balance of an account; zero if never posted to
    pub async fn account_balance(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<AccountBalance, LedgerError> {
        self.registry.resolve(tenant_id, account_id).await?;
        Ok(self
            .port
            .get_account_balance(tenant_id, account_id)
            .await?
            .unwrap_or_else(|| AccountBalance::zero(tenant_id, account_id)))
    }

    /// Compares materialized balances and general ledger rows with the
    /// totals derived from postings
    #[instrument(skip(self))]
    pub async fn reconcile(&self, tenant_id: TenantId) -> Result<ReconciliationReport, LedgerError> {
        self.registry.tenant(tenant_id).await?;
        let postings = self.port.postings_for_tenant(tenant_id, None).await?;
        let derived = totals_by_account(
            postings.iter().map(|p| (p.account_id, p.posting_type, p.amount)),
        )?;

        let recorded_balances: BTreeMap<AccountId, SideTotals> = self
            .port
            .account_balances(tenant_id)
            .await?
            .into_iter()
            .map(|b| {
                (
                    b.account_id,
                    SideTotals {
                        debit: b.debit_total,
                        credit: b.credit_total,
                    },
                )
            })
            .collect();

        let ledger_rows = self
            .port
            .list_general_ledger(TenantScope::Tenant(tenant_id))
            .await?;
        let recorded_ledger = totals_by_account(
            ledger_rows
                .iter()
                .filter(|r| r.is_posted)
                .map(|r| (r.account_id, r.entry_type, r.amount)),
        )?;

        let mut accounts: Vec<AccountId> = derived
            .keys()
            .chain(recorded_balances.keys())
            .chain(recorded_ledger.keys())
            .copied()
            .collect();
        accounts.sort();
        accounts.dedup();

        let mut discrepancies = Vec::new();
        for account_id in &accounts {
            let expected = derived.get(account_id).copied().unwrap_or_default();
            for (source, recorded) in [
                (DiscrepancySource::AccountBalance, &recorded_balances),
                (DiscrepancySource::GeneralLedger, &recorded_ledger),
            ] {
                let actual = recorded.get(account_id).copied().unwrap_or_default();
                if actual != expected {
                    discrepancies.push(Discrepancy {
                        account_id: *account_id,
                        source,
                        recorded_debit: actual.debit,
                        recorded_credit: actual.credit,
                        derived_debit: expected.debit,
                        derived_credit: expected.credit,
                    });
                }
            }
        }

        if !discrepancies.is_empty() {
            warn!(%tenant_id, count = discrepancies.len(), "Ledger projections disagree with postings");
        }

        Ok(ReconciliationReport {
            tenant_id,
            accounts_checked: accounts.len(),
            is_consistent: discrepancies.is_empty(),
            discrepancies,
            checked_at: Utc::now(),
        })
    }
}
