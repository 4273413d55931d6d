//! PostgreSQL adapter for `LedgerPort`

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::instrument;

use core_kernel::{
    AccountId, DomainPort, HealthCheckResult, HealthCheckable, JournalEntryId, LedgerEntryId,
    PortError, TenantId, TenantScope,
};
use domain_ledger::{
    Account, AccountBalance, GeneralLedgerEntry, JournalEntry, LedgerPort, Posting, PostingBatch,
};

use crate::repositories::LedgerRepository;

#[derive(Debug, Clone)]
pub struct PostgresLedgerAdapter {
    repository: LedgerRepository,
    pool: PgPool,
}

impl PostgresLedgerAdapter {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: LedgerRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn repository(&self) -> &LedgerRepository {
        &self.repository
    }
}

impl DomainPort for PostgresLedgerAdapter {}

#[async_trait]
impl HealthCheckable for PostgresLedgerAdapter {
    async fn health_check(&self) -> HealthCheckResult {
        super::ping(&self.pool, "postgres-ledger-adapter").await
    }
}

#[async_trait]
impl LedgerPort for PostgresLedgerAdapter {
    #[instrument(skip(self, account), fields(account_id = %account.id, code = %account.account_code))]
    async fn insert_account(&self, account: &Account) -> Result<(), PortError> {
        Ok(self.repository.insert_account(account).await?)
    }

    #[instrument(skip(self, account), fields(account_id = %account.id))]
    async fn update_account(&self, account: &Account) -> Result<(), PortError> {
        Ok(self.repository.update_account(account).await?)
    }

    async fn get_account(&self, id: AccountId) -> Result<Account, PortError> {
        Ok(self.repository.get_account(id).await?)
    }

    async fn list_accounts(&self, scope: TenantScope) -> Result<Vec<Account>, PortError> {
        Ok(self.repository.list_accounts(scope).await?)
    }

    #[instrument(skip(self, entry), fields(journal_id = %entry.id))]
    async fn insert_journal(&self, entry: &JournalEntry) -> Result<(), PortError> {
        Ok(self.repository.insert_journal(entry).await?)
    }

    async fn get_journal(&self, id: JournalEntryId) -> Result<JournalEntry, PortError> {
        Ok(self.repository.get_journal(id).await?)
    }

    async fn list_journals(&self, scope: TenantScope) -> Result<Vec<JournalEntry>, PortError> {
        Ok(self.repository.list_journals(scope).await?)
    }

    #[instrument(skip(self, entry), fields(journal_id = %entry.id, status = %entry.status))]
    async fn save_journal(
        &self,
        entry: &JournalEntry,
        expected_version: i64,
    ) -> Result<(), PortError> {
        Ok(self.repository.save_journal(entry, expected_version).await?)
    }

    #[instrument(skip(self, batch), fields(journal_id = %batch.journal.id, postings = batch.postings.len()))]
    async fn commit_posting(&self, batch: PostingBatch) -> Result<Vec<Posting>, PortError> {
        Ok(self.repository.commit_posting(batch).await?)
    }

    async fn postings_for_journal(
        &self,
        tenant_id: TenantId,
        journal_id: JournalEntryId,
    ) -> Result<Vec<Posting>, PortError> {
        Ok(self
            .repository
            .postings_for_journal(tenant_id, journal_id)
            .await?)
    }

    async fn postings_for_tenant(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Posting>, PortError> {
        Ok(self.repository.postings_for_tenant(tenant_id, as_of).await?)
    }

    async fn postings_for_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Posting>, PortError> {
        Ok(self
            .repository
            .postings_for_account(tenant_id, account_id, as_of)
            .await?)
    }

    async fn list_general_ledger(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<GeneralLedgerEntry>, PortError> {
        Ok(self.repository.list_general_ledger(scope).await?)
    }

    async fn get_general_ledger(&self, id: LedgerEntryId) -> Result<GeneralLedgerEntry, PortError> {
        Ok(self.repository.get_general_ledger(id).await?)
    }

    async fn get_account_balance(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Option<AccountBalance>, PortError> {
        Ok(self
            .repository
            .get_account_balance(tenant_id, account_id)
            .await?)
    }

    async fn account_balances(&self, tenant_id: TenantId) -> Result<Vec<AccountBalance>, PortError> {
        Ok(self.repository.account_balances(tenant_id).await?)
    }
}
