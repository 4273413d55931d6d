//! In-memory implementation of `LedgerPort`
//!
//! Each tenant's books sit behind their own lock, so a posting commit for
//! one tenant never blocks another. A commit holds its tenant's write lock
//! for the whole batch, which makes it atomic for readers.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use core_kernel::{
    AccountId, DomainPort, HealthCheckResult, HealthCheckable, JournalEntryId, LedgerEntryId,
    PortError, TenantId, TenantScope,
};

use crate::account::Account;
use crate::journal::JournalEntry;
use crate::ports::LedgerPort;
use crate::posting::{AccountBalance, GeneralLedgerEntry, Posting, PostingBatch};

#[derive(Debug, Default)]
struct LedgerBook {
    accounts: BTreeMap<AccountId, Account>,
    journals: BTreeMap<JournalEntryId, JournalEntry>,
    postings: Vec<Posting>,
    general_ledger: Vec<GeneralLedgerEntry>,
    balances: BTreeMap<AccountId, AccountBalance>,
    next_sequence: i64,
}

type SharedBook = Arc<RwLock<LedgerBook>>;

#[derive(Debug, Default, Clone)]
pub struct InMemoryLedgerStore {
    books: Arc<RwLock<BTreeMap<TenantId, SharedBook>>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn book(&self, tenant_id: TenantId) -> SharedBook {
        if let Some(book) = self.books.read().await.get(&tenant_id) {
            return Arc::clone(book);
        }
        Arc::clone(self.books.write().await.entry(tenant_id).or_default())
    }

    async fn existing_book(&self, tenant_id: TenantId) -> Option<SharedBook> {
        self.books.read().await.get(&tenant_id).cloned()
    }

    async fn books_in(&self, scope: TenantScope) -> Vec<SharedBook> {
        let books = self.books.read().await;
        books
            .iter()
            .filter(|(tenant_id, _)| scope.matches(**tenant_id))
            .map(|(_, book)| Arc::clone(book))
            .collect()
    }

    /// Overwrites a materialized balance; lets tests simulate a drifted
    /// projection
    pub async fn overwrite_balance(&self, balance: AccountBalance) {
        let book = self.book(balance.tenant_id).await;
        book.write().await.balances.insert(balance.account_id, balance);
    }
}

impl DomainPort for InMemoryLedgerStore {}

#[async_trait]
impl HealthCheckable for InMemoryLedgerStore {
    async fn health_check(&self) -> HealthCheckResult {
        HealthCheckResult::healthy("memory-ledger", 0)
    }
}

fn on_or_before(as_of: Option<NaiveDate>) -> impl Fn(&&Posting) -> bool {
    move |p| as_of.map_or(true, |d| p.posting_date <= d)
}

#[async_trait]
impl LedgerPort for InMemoryLedgerStore {
    async fn insert_account(&self, account: &Account) -> Result<(), PortError> {
        let book = self.book(account.tenant_id).await;
        let mut book = book.write().await;
        if book
            .accounts
            .values()
            .any(|a| a.account_code == account.account_code)
        {
            return Err(PortError::conflict(format!(
                "account code {} already exists for tenant {}",
                account.account_code, account.tenant_id
            )));
        }
        book.accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn update_account(&self, account: &Account) -> Result<(), PortError> {
        let book = self.book(account.tenant_id).await;
        let mut book = book.write().await;
        match book.accounts.get_mut(&account.id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(PortError::not_found("Account", account.id)),
        }
    }

    async fn get_account(&self, id: AccountId) -> Result<Account, PortError> {
        for book in self.books_in(TenantScope::All).await {
            if let Some(account) = book.read().await.accounts.get(&id) {
                return Ok(account.clone());
            }
        }
        Err(PortError::not_found("Account", id))
    }

    async fn list_accounts(&self, scope: TenantScope) -> Result<Vec<Account>, PortError> {
        let mut accounts = Vec::new();
        for book in self.books_in(scope).await {
            let book = book.read().await;
            let mut tenant_accounts: Vec<_> = book.accounts.values().cloned().collect();
            tenant_accounts.sort_by(|a, b| a.account_code.cmp(&b.account_code));
            accounts.extend(tenant_accounts);
        }
        Ok(accounts)
    }

    async fn insert_journal(&self, entry: &JournalEntry) -> Result<(), PortError> {
        let book = self.book(entry.tenant_id).await;
        let mut book = book.write().await;
        if book.journals.contains_key(&entry.id) {
            return Err(PortError::conflict(format!("journal entry {} already exists", entry.id)));
        }
        book.journals.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn get_journal(&self, id: JournalEntryId) -> Result<JournalEntry, PortError> {
        for book in self.books_in(TenantScope::All).await {
            if let Some(entry) = book.read().await.journals.get(&id) {
                return Ok(entry.clone());
            }
        }
        Err(PortError::not_found("JournalEntry", id))
    }

    async fn list_journals(&self, scope: TenantScope) -> Result<Vec<JournalEntry>, PortError> {
        let mut entries = Vec::new();
        for book in self.books_in(scope).await {
            entries.extend(book.read().await.journals.values().cloned());
        }
        Ok(entries)
    }

    async fn save_journal(&self, entry: &JournalEntry, expected_version: i64) -> Result<(), PortError> {
        let book = self
            .existing_book(entry.tenant_id)
            .await
            .ok_or_else(|| PortError::not_found("JournalEntry", entry.id))?;
        let mut book = book.write().await;
        let stored = book
            .journals
            .get_mut(&entry.id)
            .ok_or_else(|| PortError::not_found("JournalEntry", entry.id))?;
        if stored.version != expected_version {
            return Err(PortError::conflict(format!(
                "journal entry {} is at version {}, expected {}",
                entry.id, stored.version, expected_version
            )));
        }
        *stored = entry.clone();
        Ok(())
    }

    async fn commit_posting(&self, batch: PostingBatch) -> Result<Vec<Posting>, PortError> {
        let tenant_id = batch.journal.tenant_id;
        let journal_id = batch.journal.id;
        let book = self
            .existing_book(tenant_id)
            .await
            .ok_or_else(|| PortError::not_found("JournalEntry", journal_id))?;
        let mut book = book.write().await;

        // All checks before the first write.
        let stored_version = book
            .journals
            .get(&journal_id)
            .map(|j| j.version)
            .ok_or_else(|| PortError::not_found("JournalEntry", journal_id))?;
        if stored_version != batch.expected_version {
            return Err(PortError::conflict(format!(
                "journal entry {} is at version {}, expected {}",
                journal_id, stored_version, batch.expected_version
            )));
        }
        if book.postings.iter().any(|p| p.journal_id == journal_id) {
            return Err(PortError::conflict(format!(
                "journal entry {} already has postings",
                journal_id
            )));
        }
        let now = batch.journal.updated_at;
        let mut balances = Vec::with_capacity(batch.balance_deltas.len());
        for delta in &batch.balance_deltas {
            if !book.accounts.contains_key(&delta.account_id) {
                return Err(PortError::not_found("Account", delta.account_id));
            }
            let mut balance = book
                .balances
                .get(&delta.account_id)
                .cloned()
                .unwrap_or_else(|| AccountBalance::zero(tenant_id, delta.account_id));
            balance.apply(delta, now).map_err(|e| {
                PortError::validation(format!("balance of account {}: {}", delta.account_id, e))
            })?;
            balances.push(balance);
        }

        let mut written = Vec::with_capacity(batch.postings.len());
        for mut posting in batch.postings {
            book.next_sequence += 1;
            posting.sequence = book.next_sequence;
            written.push(posting);
        }
        book.postings.extend(written.iter().cloned());
        book.general_ledger.extend(batch.ledger_entries);
        for balance in balances {
            book.balances.insert(balance.account_id, balance);
        }
        book.journals.insert(journal_id, batch.journal);

        debug!(%journal_id, postings = written.len(), "Posting batch committed");
        Ok(written)
    }

    async fn postings_for_journal(
        &self,
        tenant_id: TenantId,
        journal_id: JournalEntryId,
    ) -> Result<Vec<Posting>, PortError> {
        let Some(book) = self.existing_book(tenant_id).await else {
            return Ok(Vec::new());
        };
        let book = book.read().await;
        let mut postings: Vec<_> = book
            .postings
            .iter()
            .filter(|p| p.journal_id == journal_id)
            .cloned()
            .collect();
        postings.sort_by_key(|p| p.line_number);
        Ok(postings)
    }

    async fn postings_for_tenant(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Posting>, PortError> {
        let Some(book) = self.existing_book(tenant_id).await else {
            return Ok(Vec::new());
        };
        let book = book.read().await;
        let mut postings: Vec<_> = book
            .postings
            .iter()
            .filter(on_or_before(as_of))
            .cloned()
            .collect();
        postings.sort_by_key(|p| (p.posting_date, p.sequence));
        Ok(postings)
    }

    async fn postings_for_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Posting>, PortError> {
        let Some(book) = self.existing_book(tenant_id).await else {
            return Ok(Vec::new());
        };
        let book = book.read().await;
        let mut postings: Vec<_> = book
            .postings
            .iter()
            .filter(|p| p.account_id == account_id)
            .filter(on_or_before(as_of))
            .cloned()
            .collect();
        postings.sort_by_key(|p| (p.posting_date, p.sequence));
        Ok(postings)
    }

    async fn list_general_ledger(&self, scope: TenantScope) -> Result<Vec<GeneralLedgerEntry>, PortError> {
        let mut rows = Vec::new();
        for book in self.books_in(scope).await {
            rows.extend(book.read().await.general_ledger.iter().cloned());
        }
        Ok(rows)
    }

    async fn get_general_ledger(&self, id: LedgerEntryId) -> Result<GeneralLedgerEntry, PortError> {
        for book in self.books_in(TenantScope::All).await {
            if let Some(row) = book.read().await.general_ledger.iter().find(|r| r.id == id) {
                return Ok(row.clone());
            }
        }
        Err(PortError::not_found("GeneralLedger", id))
    }

    async fn get_account_balance(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Option<AccountBalance>, PortError> {
        let Some(book) = self.existing_book(tenant_id).await else {
            return Ok(None);
        };
        let balance = book.read().await.balances.get(&account_id).cloned();
        Ok(balance)
    }

    async fn account_balances(&self, tenant_id: TenantId) -> Result<Vec<AccountBalance>, PortError> {
        let Some(book) = self.existing_book(tenant_id).await else {
            return Ok(Vec::new());
        };
        let balances = book.read().await.balances.values().cloned().collect();
        Ok(balances)
    }
}
