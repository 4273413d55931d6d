//! Posting Engine
//!
//! Drives a journal entry through its status machine and materializes the
//! ledger when it is posted. Every operation on one (tenant, journal) pair
//! runs under that pair's lock; the store's version check backs this up
//! across processes.

use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument, warn};

use core_kernel::{JournalEntryId, TenantId, TenantScope};

use crate::balance::{check_balance, line_totals};
use crate::builder::{JournalBuilder, ProposedPosting};
use crate::error::LedgerError;
use crate::journal::{JournalEntry, JournalStatus};
use crate::ports::LedgerPort;
use crate::posting::{Posting, PostingBatch, PostingSet};
use crate::registry::AccountRegistry;

type LockKey = (TenantId, JournalEntryId);

/// Per-journal async locks
///
/// Idle locks are dropped the next time any lock is acquired.
#[derive(Debug, Default)]
pub struct JournalLocks {
    locks: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

impl JournalLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, tenant_id: TenantId, journal_id: JournalEntryId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry((tenant_id, journal_id)).or_default())
        };
        lock.lock_owned().await
    }

    /// Number of locks currently tracked
    pub async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}

/// Result of a successful post request
#[derive(Debug, Clone)]
pub enum PostOutcome {
    /// The entry was posted by this call
    Posted(JournalEntry),
    /// The entry was already posted with the same lines; nothing changed
    AlreadyPosted(JournalEntry),
}

impl PostOutcome {
    pub fn entry(&self) -> &JournalEntry {
        match self {
            PostOutcome::Posted(entry) | PostOutcome::AlreadyPosted(entry) => entry,
        }
    }

    pub fn into_entry(self) -> JournalEntry {
        match self {
            PostOutcome::Posted(entry) | PostOutcome::AlreadyPosted(entry) => entry,
        }
    }

    pub fn was_already_posted(&self) -> bool {
        matches!(self, PostOutcome::AlreadyPosted(_))
    }
}

#[derive(Clone)]
pub struct PostingEngine {
    port: Arc<dyn LedgerPort>,
    registry: AccountRegistry,
    locks: Arc<JournalLocks>,
}

impl PostingEngine {
    pub fn new(port: Arc<dyn LedgerPort>, registry: AccountRegistry) -> Self {
        Self {
            port,
            registry,
            locks: Arc::new(JournalLocks::new()),
        }
    }

    pub fn registry(&self) -> &AccountRegistry {
        &self.registry
    }

    /// Builds and stores a DRAFT entry
    #[instrument(skip(self, builder), fields(tenant_id = %builder.tenant_id()))]
    pub async fn create_entry(&self, builder: JournalBuilder) -> Result<JournalEntry, LedgerError> {
        let entry = builder.build(&self.registry).await?;
        self.port.insert_journal(&entry).await?;
        info!(journal_id = %entry.id, lines = entry.lines.len(), "Journal entry drafted");
        Ok(entry)
    }

    /// Loads an entry, treating another tenant's entry as missing
    pub async fn get(&self, tenant_id: TenantId, id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        let entry = self.port.get_journal(id).await?;
        if entry.tenant_id != tenant_id {
            return Err(LedgerError::not_found("JournalEntry", id));
        }
        Ok(entry)
    }

    /// Retrieves an entry by ID without a tenant check
    pub async fn find(&self, id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        Ok(self.port.get_journal(id).await?)
    }

    pub async fn list(&self, scope: TenantScope) -> Result<Vec<JournalEntry>, LedgerError> {
        Ok(self.port.list_journals(scope).await?)
    }

    /// Materialized postings of an entry; empty unless it is POSTED
    pub async fn postings(&self, tenant_id: TenantId, id: JournalEntryId) -> Result<Vec<Posting>, LedgerError> {
        self.get(tenant_id, id).await?;
        Ok(self.port.postings_for_journal(tenant_id, id).await?)
    }

    /// DRAFT → VALIDATED
    ///
    /// Totals are re-derived from the lines. An unbalanced entry fails with
    /// `Unbalanced` and stays DRAFT.
    #[instrument(skip(self))]
    pub async fn validate(&self, tenant_id: TenantId, id: JournalEntryId) -> Result<JournalEntry, LedgerError> {
        let _guard = self.locks.acquire(tenant_id, id).await;
        let mut entry = self.get(tenant_id, id).await?;
        if entry.status != JournalStatus::Draft {
            return Err(LedgerError::InvalidTransition {
                from: entry.status,
                to: JournalStatus::Validated,
            });
        }

        let (total_debit, total_credit) = line_totals(&entry.lines)?;
        if let Err(e) = check_balance(total_debit, total_credit) {
            warn!(journal_id = %id, %total_debit, %total_credit, "Journal entry is unbalanced");
            return Err(e);
        }

        let expected = entry.version;
        entry.mark_validated(total_debit, total_credit)?;
        self.port.save_journal(&entry, expected).await?;
        info!(journal_id = %id, "Journal entry validated");
        Ok(entry)
    }

    /// DRAFT → REJECTED
    #[instrument(skip(self, reason))]
    pub async fn reject(
        &self,
        tenant_id: TenantId,
        id: JournalEntryId,
        reason: impl Into<String>,
    ) -> Result<JournalEntry, LedgerError> {
        let reason = reason.into().trim().to_string();
        if reason.is_empty() {
            return Err(LedgerError::validation("a rejection reason is required"));
        }

        let _guard = self.locks.acquire(tenant_id, id).await;
        let mut entry = self.get(tenant_id, id).await?;
        let expected = entry.version;
        entry.reject(reason)?;
        self.port.save_journal(&entry, expected).await?;
        info!(journal_id = %id, "Journal entry rejected");
        Ok(entry)
    }

    /// VALIDATED → POSTED, or an idempotent repeat of an earlier post
    ///
    /// `posting_set`, when given, must match the entry's lines as a
    /// multiset. Re-posting a POSTED entry with the same set succeeds
    /// without writing; with a different set it fails `ConflictingRepost`.
    /// If materialization fails nothing is written, the entry stays
    /// VALIDATED and the failure is recorded in `failureReason`.
    #[instrument(skip(self, posting_set))]
    pub async fn post(
        &self,
        tenant_id: TenantId,
        id: JournalEntryId,
        posting_set: Option<Vec<ProposedPosting>>,
    ) -> Result<PostOutcome, LedgerError> {
        let _guard = self.locks.acquire(tenant_id, id).await;
        let entry = self.get(tenant_id, id).await?;
        let requested = match &posting_set {
            Some(set) => PostingSet::from_proposed(set),
            None => entry.posting_set(),
        };

        match entry.status {
            JournalStatus::Draft | JournalStatus::Rejected => Err(LedgerError::InvalidTransition {
                from: entry.status,
                to: JournalStatus::Posted,
            }),
            JournalStatus::Posted => {
                let existing = self.port.postings_for_journal(tenant_id, id).await?;
                if PostingSet::from_postings(&existing) == requested {
                    info!(journal_id = %id, "Journal entry already posted, nothing to do");
                    Ok(PostOutcome::AlreadyPosted(entry))
                } else {
                    warn!(journal_id = %id, "Re-post with different lines refused");
                    Err(LedgerError::ConflictingRepost(id.to_string()))
                }
            }
            JournalStatus::Validated => {
                if requested != entry.posting_set() {
                    return Err(LedgerError::validation(
                        "posting set does not match the journal entry lines",
                    ));
                }
                match self.materialize(&entry).await {
                    Ok(posted) => {
                        info!(journal_id = %id, "Journal entry posted");
                        Ok(PostOutcome::Posted(posted))
                    }
                    Err(e) => {
                        self.record_failure(entry, &e).await;
                        Err(e)
                    }
                }
            }
        }
    }

    async fn materialize(&self, entry: &JournalEntry) -> Result<JournalEntry, LedgerError> {
        let tenant = self.registry.tenant(entry.tenant_id).await?;

        let mut account_types = BTreeMap::new();
        for account_id in entry.account_ids() {
            let account = self.registry.resolve_postable(entry.tenant_id, account_id).await?;
            account_types.insert(account_id, account.account_type);
        }

        let (total_debit, total_credit) = line_totals(&entry.lines)?;
        check_balance(total_debit, total_credit)?;

        let now = Utc::now();
        let expected = entry.version;
        let mut posted = entry.clone();
        posted.mark_posted(now)?;

        let batch = PostingBatch::materialize(
            posted.clone(),
            expected,
            &account_types,
            tenant.timezone.date_at(now),
            now,
        )
        .ok_or_else(|| LedgerError::validation("journal lines cannot be materialized"))?;

        self.port.commit_posting(batch).await?;
        Ok(posted)
    }

    async fn record_failure(&self, mut entry: JournalEntry, error: &LedgerError) {
        let expected = entry.version;
        entry.record_failure(error.to_string());
        if let Err(save_error) = self.port.save_journal(&entry, expected).await {
            warn!(
                journal_id = %entry.id,
                error = %save_error,
                "Could not record post failure on journal entry"
            );
        } else {
            warn!(journal_id = %entry.id, error = %error, "Post failed, entry left VALIDATED");
        }
    }
}
