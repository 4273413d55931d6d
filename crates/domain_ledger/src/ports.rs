//! Ledger Domain Ports
//!
//! `LedgerPort` is the storage seam for accounts, journal entries and the
//! materialized ledger. It is implemented by the Postgres adapter in
//! `infra_db` and by [`InMemoryLedgerStore`](crate::adapters::InMemoryLedgerStore).
//!
//! List methods take an explicit [`TenantScope`]. Methods that feed the
//! posting engine or the ledger queries take a concrete [`TenantId`].

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{
    AccountId, DomainPort, HealthCheckable, JournalEntryId, LedgerEntryId, PortError, TenantId,
    TenantScope,
};

use crate::account::Account;
use crate::journal::JournalEntry;
use crate::posting::{AccountBalance, GeneralLedgerEntry, Posting, PostingBatch};

#[async_trait]
pub trait LedgerPort: DomainPort + HealthCheckable {
    // ------------------------------------------------------------------
    // Chart of accounts
    // ------------------------------------------------------------------

    /// Stores a new account; `Conflict` if the code is taken in the tenant
    async fn insert_account(&self, account: &Account) -> Result<(), PortError>;

    /// Replaces a stored account
    async fn update_account(&self, account: &Account) -> Result<(), PortError>;

    /// Retrieves an account by ID regardless of tenant
    async fn get_account(&self, id: AccountId) -> Result<Account, PortError>;

    /// Lists accounts ordered by tenant and account code
    async fn list_accounts(&self, scope: TenantScope) -> Result<Vec<Account>, PortError>;

    // ------------------------------------------------------------------
    // Journal entries
    // ------------------------------------------------------------------

    async fn insert_journal(&self, entry: &JournalEntry) -> Result<(), PortError>;

    /// Retrieves a journal entry by ID regardless of tenant
    async fn get_journal(&self, id: JournalEntryId) -> Result<JournalEntry, PortError>;

    async fn list_journals(&self, scope: TenantScope) -> Result<Vec<JournalEntry>, PortError>;

    /// Writes `entry` if the stored version equals `expected_version`
    ///
    /// Returns `Conflict` when another writer got there first.
    async fn save_journal(
        &self,
        entry: &JournalEntry,
        expected_version: i64,
    ) -> Result<(), PortError>;

    // ------------------------------------------------------------------
    // Materialized ledger
    // ------------------------------------------------------------------

    /// Atomically writes postings, general ledger rows, balance deltas and
    /// the POSTED journal, or nothing
    async fn commit_posting(&self, batch: PostingBatch) -> Result<Vec<Posting>, PortError>;

    /// Postings of one journal entry in line order
    async fn postings_for_journal(
        &self,
        tenant_id: TenantId,
        journal_id: JournalEntryId,
    ) -> Result<Vec<Posting>, PortError>;

    /// Postings of a tenant dated on or before `as_of`, in
    /// (posting date, sequence) order
    async fn postings_for_tenant(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Posting>, PortError>;

    /// Postings of one account in (posting date, sequence) order
    async fn postings_for_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Posting>, PortError>;

    async fn list_general_ledger(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<GeneralLedgerEntry>, PortError>;

    async fn get_general_ledger(&self, id: LedgerEntryId) -> Result<GeneralLedgerEntry, PortError>;

    /// Materialized balance of one account, if it has ever been posted to
    async fn get_account_balance(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Option<AccountBalance>, PortError>;

    async fn account_balances(&self, tenant_id: TenantId) -> Result<Vec<AccountBalance>, PortError>;
}
