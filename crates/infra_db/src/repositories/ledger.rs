//! Ledger repository
//!
//! Chart of accounts, journal entries and the materialized ledger. The
//! posting commit is the only statement group that touches journal state and
//! ledger state together; it runs in one transaction with the journal row
//! locked `FOR UPDATE`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use core_kernel::{
    AccountId, JournalEntryId, LedgerEntryId, PostingId, TenantId, TenantScope,
};
use domain_ledger::{
    Account, AccountBalance, AccountType, GeneralLedgerEntry, JournalEntry, JournalLine,
    JournalStatus, Posting, PostingBatch, PostingType,
};

use super::{parse_column, scope_param, signed_column, unsigned_column};
use crate::error::DatabaseError;

// ----------------------------------------------------------------------
// Rows
// ----------------------------------------------------------------------

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub account_id: Uuid,
    pub tenant_id: Uuid,
    pub account_code: String,
    pub account_name: String,
    pub account_description: Option<String>,
    pub account_type: String,
    pub account_subtype: Option<String>,
    pub gst_applicable: bool,
    pub default_gst_rate: Option<Decimal>,
    pub allow_manual_entries: bool,
    pub is_active: bool,
    pub archived_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DatabaseError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId::from_uuid(row.account_id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            account_code: row.account_code,
            account_name: row.account_name,
            account_description: row.account_description,
            account_type: parse_column::<AccountType>("account_type", &row.account_type)?,
            account_subtype: row.account_subtype,
            gst_applicable: row.gst_applicable,
            default_gst_rate: row.default_gst_rate,
            allow_manual_entries: row.allow_manual_entries,
            is_active: row.is_active,
            archived_at: row.archived_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalRow {
    pub journal_id: Uuid,
    pub tenant_id: Uuid,
    pub entry_number: String,
    pub entry_date: NaiveDate,
    pub description: String,
    pub status: String,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
    pub is_balanced: bool,
    pub failure_reason: Option<String>,
    pub rejection_reason: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct JournalLineRow {
    pub journal_id: Uuid,
    pub line_number: i32,
    pub account_id: Uuid,
    pub posting_type: String,
    pub amount: Decimal,
    pub line_description: Option<String>,
}

impl TryFrom<JournalLineRow> for JournalLine {
    type Error = DatabaseError;

    fn try_from(row: JournalLineRow) -> Result<Self, Self::Error> {
        Ok(JournalLine {
            line_number: unsigned_column("line_number", row.line_number)?,
            account_id: AccountId::from_uuid(row.account_id),
            posting_type: parse_column::<PostingType>("posting_type", &row.posting_type)?,
            amount: row.amount,
            line_description: row.line_description,
        })
    }
}

impl JournalRow {
    fn into_entry(self, lines: Vec<JournalLine>) -> Result<JournalEntry, DatabaseError> {
        Ok(JournalEntry {
            id: JournalEntryId::from_uuid(self.journal_id),
            tenant_id: TenantId::from_uuid(self.tenant_id),
            entry_number: self.entry_number,
            entry_date: self.entry_date,
            description: self.description,
            status: parse_column::<JournalStatus>("status", &self.status)?,
            total_debit: self.total_debit,
            total_credit: self.total_credit,
            is_balanced: self.is_balanced,
            lines,
            failure_reason: self.failure_reason,
            rejection_reason: self.rejection_reason,
            posted_at: self.posted_at,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostingRow {
    pub posting_id: Uuid,
    pub tenant_id: Uuid,
    pub journal_id: Uuid,
    pub account_id: Uuid,
    pub posting_type: String,
    pub amount: Decimal,
    pub line_number: i32,
    pub line_description: Option<String>,
    pub posting_date: NaiveDate,
    pub sequence: i64,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<PostingRow> for Posting {
    type Error = DatabaseError;

    fn try_from(row: PostingRow) -> Result<Self, Self::Error> {
        Ok(Posting {
            id: PostingId::from_uuid(row.posting_id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            journal_id: JournalEntryId::from_uuid(row.journal_id),
            account_id: AccountId::from_uuid(row.account_id),
            posting_type: parse_column::<PostingType>("posting_type", &row.posting_type)?,
            amount: row.amount,
            line_number: unsigned_column("line_number", row.line_number)?,
            line_description: row.line_description,
            posting_date: row.posting_date,
            sequence: row.sequence,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GeneralLedgerRow {
    pub gl_id: Uuid,
    pub tenant_id: Uuid,
    pub account_id: Uuid,
    pub journal_id: Uuid,
    pub transaction_date: NaiveDate,
    pub posting_date: NaiveDate,
    pub entry_type: String,
    pub amount: Decimal,
    pub description: Option<String>,
    pub is_posted: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GeneralLedgerRow> for GeneralLedgerEntry {
    type Error = DatabaseError;

    fn try_from(row: GeneralLedgerRow) -> Result<Self, Self::Error> {
        Ok(GeneralLedgerEntry {
            id: LedgerEntryId::from_uuid(row.gl_id),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            account_id: AccountId::from_uuid(row.account_id),
            journal_id: JournalEntryId::from_uuid(row.journal_id),
            transaction_date: row.transaction_date,
            posting_date: row.posting_date,
            entry_type: parse_column::<PostingType>("entry_type", &row.entry_type)?,
            amount: row.amount,
            description: row.description,
            is_posted: row.is_posted,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountBalanceRow {
    pub tenant_id: Uuid,
    pub account_id: Uuid,
    pub debit_total: Decimal,
    pub credit_total: Decimal,
    pub balance: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountBalanceRow> for AccountBalance {
    fn from(row: AccountBalanceRow) -> Self {
        AccountBalance {
            tenant_id: TenantId::from_uuid(row.tenant_id),
            account_id: AccountId::from_uuid(row.account_id),
            debit_total: row.debit_total,
            credit_total: row.credit_total,
            balance: row.balance,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_ACCOUNT: &str = r#"
    SELECT account_id, tenant_id, account_code, account_name, account_description,
           account_type, account_subtype, gst_applicable, default_gst_rate,
           allow_manual_entries, is_active, archived_at, created_at, updated_at
    FROM chart_of_accounts
"#;

const SELECT_JOURNAL: &str = r#"
    SELECT journal_id, tenant_id, entry_number, entry_date, description, status,
           total_debit, total_credit, is_balanced, failure_reason, rejection_reason,
           posted_at, version, created_at, updated_at
    FROM journal_entries
"#;

const SELECT_POSTING: &str = r#"
    SELECT posting_id, tenant_id, journal_id, account_id, posting_type, amount,
           line_number, line_description, posting_date, sequence, created_at
    FROM postings
"#;

const SELECT_GENERAL_LEDGER: &str = r#"
    SELECT gl_id, tenant_id, account_id, journal_id, transaction_date, posting_date,
           entry_type, amount, description, is_posted, created_at
    FROM general_ledger
"#;

#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ------------------------------------------------------------------
    // Chart of accounts
    // ------------------------------------------------------------------

    pub async fn insert_account(&self, account: &Account) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO chart_of_accounts (
                account_id, tenant_id, account_code, account_name, account_description,
                account_type, account_subtype, gst_applicable, default_gst_rate,
                allow_manual_entries, is_active, archived_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(Uuid::from(account.id))
        .bind(Uuid::from(account.tenant_id))
        .bind(&account.account_code)
        .bind(&account.account_name)
        .bind(&account.account_description)
        .bind(account.account_type.as_str())
        .bind(&account.account_subtype)
        .bind(account.gst_applicable)
        .bind(account.default_gst_rate)
        .bind(account.allow_manual_entries)
        .bind(account.is_active)
        .bind(account.archived_at)
        .bind(account.created_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn update_account(&self, account: &Account) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE chart_of_accounts
            SET account_name = $2, account_description = $3, account_subtype = $4,
                gst_applicable = $5, default_gst_rate = $6, allow_manual_entries = $7,
                is_active = $8, archived_at = $9, updated_at = $10
            WHERE account_id = $1
            "#,
        )
        .bind(Uuid::from(account.id))
        .bind(&account.account_name)
        .bind(&account.account_description)
        .bind(&account.account_subtype)
        .bind(account.gst_applicable)
        .bind(account.default_gst_rate)
        .bind(account.allow_manual_entries)
        .bind(account.is_active)
        .bind(account.archived_at)
        .bind(account.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DatabaseError::not_found("Account", account.id));
        }
        Ok(())
    }

    pub async fn get_account(&self, id: AccountId) -> Result<Account, DatabaseError> {
        let sql = format!("{} WHERE account_id = $1", SELECT_ACCOUNT);
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Account", id))?
            .try_into()
    }

    pub async fn list_accounts(&self, scope: TenantScope) -> Result<Vec<Account>, DatabaseError> {
        let sql = format!(
            "{} WHERE ($1::uuid IS NULL OR tenant_id = $1) ORDER BY tenant_id, account_code",
            SELECT_ACCOUNT
        );
        sqlx::query_as::<_, AccountRow>(&sql)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    // ------------------------------------------------------------------
    // Journal entries
    // ------------------------------------------------------------------

    /// Inserts the header and its lines in one transaction
    pub async fn insert_journal(&self, entry: &JournalEntry) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO journal_entries (
                journal_id, tenant_id, entry_number, entry_date, description, status,
                total_debit, total_credit, is_balanced, failure_reason, rejection_reason,
                posted_at, version, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(Uuid::from(entry.id))
        .bind(Uuid::from(entry.tenant_id))
        .bind(&entry.entry_number)
        .bind(entry.entry_date)
        .bind(&entry.description)
        .bind(entry.status.as_str())
        .bind(entry.total_debit)
        .bind(entry.total_credit)
        .bind(entry.is_balanced)
        .bind(&entry.failure_reason)
        .bind(&entry.rejection_reason)
        .bind(entry.posted_at)
        .bind(entry.version)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&mut *tx)
        .await?;

        for line in &entry.lines {
            sqlx::query(
                r#"
                INSERT INTO journal_lines (
                    journal_id, line_number, account_id, posting_type, amount, line_description
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::from(entry.id))
            .bind(signed_column("line_number", line.line_number)?)
            .bind(Uuid::from(line.account_id))
            .bind(line.posting_type.as_str())
            .bind(line.amount)
            .bind(&line.line_description)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn get_journal(&self, id: JournalEntryId) -> Result<JournalEntry, DatabaseError> {
        let sql = format!("{} WHERE journal_id = $1", SELECT_JOURNAL);
        let row = sqlx::query_as::<_, JournalRow>(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("JournalEntry", id))?;

        let mut lines = self.lines_for(&[row.journal_id]).await?;
        let lines = lines.remove(&row.journal_id).unwrap_or_default();
        row.into_entry(lines)
    }

    pub async fn list_journals(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<JournalEntry>, DatabaseError> {
        let sql = format!(
            "{} WHERE ($1::uuid IS NULL OR tenant_id = $1) ORDER BY tenant_id, created_at, journal_id",
            SELECT_JOURNAL
        );
        let rows = sqlx::query_as::<_, JournalRow>(&sql)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.journal_id).collect();
        let mut lines = self.lines_for(&ids).await?;
        rows.into_iter()
            .map(|row| {
                let entry_lines = lines.remove(&row.journal_id).unwrap_or_default();
                row.into_entry(entry_lines)
            })
            .collect()
    }

    async fn lines_for(
        &self,
        journal_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<JournalLine>>, DatabaseError> {
        let rows = sqlx::query_as::<_, JournalLineRow>(
            r#"
            SELECT journal_id, line_number, account_id, posting_type, amount, line_description
            FROM journal_lines
            WHERE journal_id = ANY($1)
            ORDER BY journal_id, line_number
            "#,
        )
        .bind(journal_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<Uuid, Vec<JournalLine>> = HashMap::new();
        for row in rows {
            let journal_id = row.journal_id;
            grouped.entry(journal_id).or_default().push(row.try_into()?);
        }
        Ok(grouped)
    }

    /// Writes the journal header if its stored version is `expected_version`
    ///
    /// Lines are fixed once the draft is created, so only the header moves.
    pub async fn save_journal(
        &self,
        entry: &JournalEntry,
        expected_version: i64,
    ) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;
        Self::update_journal_header(&mut tx, entry, expected_version).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update_journal_header(
        tx: &mut Transaction<'_, Postgres>,
        entry: &JournalEntry,
        expected_version: i64,
    ) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            r#"
            UPDATE journal_entries
            SET status = $3, total_debit = $4, total_credit = $5, is_balanced = $6,
                failure_reason = $7, rejection_reason = $8, posted_at = $9,
                version = $10, updated_at = $11
            WHERE journal_id = $1 AND version = $2
            "#,
        )
        .bind(Uuid::from(entry.id))
        .bind(expected_version)
        .bind(entry.status.as_str())
        .bind(entry.total_debit)
        .bind(entry.total_credit)
        .bind(entry.is_balanced)
        .bind(&entry.failure_reason)
        .bind(&entry.rejection_reason)
        .bind(entry.posted_at)
        .bind(entry.version)
        .bind(entry.updated_at)
        .execute(&mut **tx)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let stored: Option<i64> =
            sqlx::query_scalar("SELECT version FROM journal_entries WHERE journal_id = $1")
                .bind(Uuid::from(entry.id))
                .fetch_optional(&mut **tx)
                .await?;
        match stored {
            None => Err(DatabaseError::not_found("JournalEntry", entry.id)),
            Some(version) => Err(DatabaseError::VersionConflict(format!(
                "journal entry {} is at version {}, expected {}",
                entry.id, version, expected_version
            ))),
        }
    }

    // ------------------------------------------------------------------
    // Posting commit
    // ------------------------------------------------------------------

    /// Writes a posting batch atomically
    ///
    /// The journal row is locked first, so two concurrent commits for the
    /// same entry serialize here and the loser fails the version check.
    pub async fn commit_posting(&self, batch: PostingBatch) -> Result<Vec<Posting>, DatabaseError> {
        let journal_id = batch.journal.id;
        let mut tx = self.pool.begin().await?;

        let stored: Option<i64> = sqlx::query_scalar(
            "SELECT version FROM journal_entries WHERE journal_id = $1 AND tenant_id = $2 FOR UPDATE",
        )
        .bind(Uuid::from(journal_id))
        .bind(Uuid::from(batch.journal.tenant_id))
        .fetch_optional(&mut *tx)
        .await?;
        match stored {
            None => return Err(DatabaseError::not_found("JournalEntry", journal_id)),
            Some(version) if version != batch.expected_version => {
                return Err(DatabaseError::VersionConflict(format!(
                    "journal entry {} is at version {}, expected {}",
                    journal_id, version, batch.expected_version
                )))
            }
            Some(_) => {}
        }

        let already_posted: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM postings WHERE journal_id = $1)")
                .bind(Uuid::from(journal_id))
                .fetch_one(&mut *tx)
                .await?;
        if already_posted {
            return Err(DatabaseError::VersionConflict(format!(
                "journal entry {} already has postings",
                journal_id
            )));
        }

        let mut written = Vec::with_capacity(batch.postings.len());
        for mut posting in batch.postings {
            let sequence: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO postings (
                    posting_id, tenant_id, journal_id, account_id, posting_type, amount,
                    line_number, line_description, posting_date, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING sequence
                "#,
            )
            .bind(Uuid::from(posting.id))
            .bind(Uuid::from(posting.tenant_id))
            .bind(Uuid::from(posting.journal_id))
            .bind(Uuid::from(posting.account_id))
            .bind(posting.posting_type.as_str())
            .bind(posting.amount)
            .bind(signed_column("line_number", posting.line_number)?)
            .bind(&posting.line_description)
            .bind(posting.posting_date)
            .bind(posting.created_at)
            .fetch_one(&mut *tx)
            .await?;
            posting.sequence = sequence;
            written.push(posting);
        }

        for row in &batch.ledger_entries {
            sqlx::query(
                r#"
                INSERT INTO general_ledger (
                    gl_id, tenant_id, account_id, journal_id, transaction_date, posting_date,
                    entry_type, amount, description, is_posted, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(Uuid::from(row.id))
            .bind(Uuid::from(row.tenant_id))
            .bind(Uuid::from(row.account_id))
            .bind(Uuid::from(row.journal_id))
            .bind(row.transaction_date)
            .bind(row.posting_date)
            .bind(row.entry_type.as_str())
            .bind(row.amount)
            .bind(&row.description)
            .bind(row.is_posted)
            .bind(row.created_at)
            .execute(&mut *tx)
            .await?;
        }

        let now = batch.journal.updated_at;
        for delta in &batch.balance_deltas {
            sqlx::query(
                r#"
                INSERT INTO account_balances (
                    account_id, tenant_id, debit_total, credit_total, balance, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $7)
                ON CONFLICT (account_id) DO UPDATE SET
                    debit_total = account_balances.debit_total + EXCLUDED.debit_total,
                    credit_total = account_balances.credit_total + EXCLUDED.credit_total,
                    balance = CASE WHEN $6
                        THEN (account_balances.debit_total + EXCLUDED.debit_total)
                           - (account_balances.credit_total + EXCLUDED.credit_total)
                        ELSE (account_balances.credit_total + EXCLUDED.credit_total)
                           - (account_balances.debit_total + EXCLUDED.debit_total)
                    END,
                    updated_at = EXCLUDED.updated_at
                "#,
            )
            .bind(Uuid::from(delta.account_id))
            .bind(Uuid::from(batch.journal.tenant_id))
            .bind(delta.debit)
            .bind(delta.credit)
            .bind(delta.account_type.signed_balance(delta.debit, delta.credit))
            .bind(delta.account_type.is_debit_normal())
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        Self::update_journal_header(&mut tx, &batch.journal, batch.expected_version).await?;
        tx.commit().await?;

        debug!(%journal_id, postings = written.len(), "Posting batch committed");
        Ok(written)
    }

    // ------------------------------------------------------------------
    // Materialized ledger reads
    // ------------------------------------------------------------------

    pub async fn postings_for_journal(
        &self,
        tenant_id: TenantId,
        journal_id: JournalEntryId,
    ) -> Result<Vec<Posting>, DatabaseError> {
        let sql = format!(
            "{} WHERE tenant_id = $1 AND journal_id = $2 ORDER BY line_number",
            SELECT_POSTING
        );
        sqlx::query_as::<_, PostingRow>(&sql)
            .bind(Uuid::from(tenant_id))
            .bind(Uuid::from(journal_id))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Posting::try_from)
            .collect()
    }

    pub async fn postings_for_tenant(
        &self,
        tenant_id: TenantId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Posting>, DatabaseError> {
        let sql = format!(
            "{} WHERE tenant_id = $1 AND ($2::date IS NULL OR posting_date <= $2) \
             ORDER BY posting_date, sequence",
            SELECT_POSTING
        );
        sqlx::query_as::<_, PostingRow>(&sql)
            .bind(Uuid::from(tenant_id))
            .bind(as_of)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Posting::try_from)
            .collect()
    }

    pub async fn postings_for_account(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
        as_of: Option<NaiveDate>,
    ) -> Result<Vec<Posting>, DatabaseError> {
        let sql = format!(
            "{} WHERE tenant_id = $1 AND account_id = $2 AND ($3::date IS NULL OR posting_date <= $3) \
             ORDER BY posting_date, sequence",
            SELECT_POSTING
        );
        sqlx::query_as::<_, PostingRow>(&sql)
            .bind(Uuid::from(tenant_id))
            .bind(Uuid::from(account_id))
            .bind(as_of)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Posting::try_from)
            .collect()
    }

    pub async fn list_general_ledger(
        &self,
        scope: TenantScope,
    ) -> Result<Vec<GeneralLedgerEntry>, DatabaseError> {
        let sql = format!(
            "{} WHERE ($1::uuid IS NULL OR tenant_id = $1) ORDER BY tenant_id, created_at, gl_id",
            SELECT_GENERAL_LEDGER
        );
        sqlx::query_as::<_, GeneralLedgerRow>(&sql)
            .bind(scope_param(scope))
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(GeneralLedgerEntry::try_from)
            .collect()
    }

    pub async fn get_general_ledger(
        &self,
        id: LedgerEntryId,
    ) -> Result<GeneralLedgerEntry, DatabaseError> {
        let sql = format!("{} WHERE gl_id = $1", SELECT_GENERAL_LEDGER);
        sqlx::query_as::<_, GeneralLedgerRow>(&sql)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("GeneralLedger", id))?
            .try_into()
    }

    pub async fn get_account_balance(
        &self,
        tenant_id: TenantId,
        account_id: AccountId,
    ) -> Result<Option<AccountBalance>, DatabaseError> {
        let row = sqlx::query_as::<_, AccountBalanceRow>(
            r#"
            SELECT tenant_id, account_id, debit_total, credit_total, balance, updated_at
            FROM account_balances
            WHERE tenant_id = $1 AND account_id = $2
            "#,
        )
        .bind(Uuid::from(tenant_id))
        .bind(Uuid::from(account_id))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(AccountBalance::from))
    }

    pub async fn account_balances(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<AccountBalance>, DatabaseError> {
        let rows = sqlx::query_as::<_, AccountBalanceRow>(
            r#"
            SELECT tenant_id, account_id, debit_total, credit_total, balance, updated_at
            FROM account_balances
            WHERE tenant_id = $1
            ORDER BY account_id
            "#,
        )
        .bind(Uuid::from(tenant_id))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(AccountBalance::from).collect())
    }
}
