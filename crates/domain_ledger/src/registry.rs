//! Account Registry
//!
//! Registers accounts per tenant and answers the question the journal
//! builder and posting engine keep asking: may this tenant post to this
//! account?

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use core_kernel::{AccountId, TenantId, TenantScope};
use domain_tenant::{Tenant, TenantPort};

use crate::account::{Account, NewAccount, StandardChart};
use crate::error::LedgerError;
use crate::ports::LedgerPort;

#[derive(Clone)]
pub struct AccountRegistry {
    ledger: Arc<dyn LedgerPort>,
    tenants: Arc<dyn TenantPort>,
}

impl AccountRegistry {
    pub fn new(ledger: Arc<dyn LedgerPort>, tenants: Arc<dyn TenantPort>) -> Self {
        Self { ledger, tenants }
    }

    /// Loads the owning tenant, or `NotFound`
    pub async fn tenant(&self, tenant_id: TenantId) -> Result<Tenant, LedgerError> {
        Ok(self.tenants.get_tenant(tenant_id).await?)
    }

    /// Registers a new account in the tenant's chart
    #[instrument(skip(self, new), fields(tenant_id = %new.tenant_id, code = %new.account_code))]
    pub async fn register(&self, new: NewAccount) -> Result<Account, LedgerError> {
        self.tenant(new.tenant_id).await?;
        let account = Account::create(new)?;
        self.ledger.insert_account(&account).await?;
        info!(account_id = %account.id, "Account registered");
        Ok(account)
    }

    /// Registers [`StandardChart`] for a tenant with an empty chart
    pub async fn seed_standard_chart(&self, tenant_id: TenantId) -> Result<Vec<Account>, LedgerError> {
        let existing = self.ledger.list_accounts(TenantScope::Tenant(tenant_id)).await?;
        if !existing.is_empty() {
            return Err(LedgerError::Conflict(format!(
                "tenant {} already has {} accounts",
                tenant_id,
                existing.len()
            )));
        }
        let mut accounts = Vec::new();
        for new in StandardChart::accounts(tenant_id) {
            accounts.push(self.register(new).await?);
        }
        Ok(accounts)
    }

    /// Returns the account only if it belongs to `tenant_id`
    pub async fn resolve(&self, tenant_id: TenantId, id: AccountId) -> Result<Account, LedgerError> {
        let account = self.ledger.get_account(id).await?;
        if account.tenant_id != tenant_id {
            debug!(%id, %tenant_id, owner = %account.tenant_id, "Account belongs to another tenant");
            return Err(LedgerError::not_found("Account", id));
        }
        Ok(account)
    }

    /// Like [`resolve`](Self::resolve) but also requires the account to accept postings
    pub async fn resolve_postable(
        &self,
        tenant_id: TenantId,
        id: AccountId,
    ) -> Result<Account, LedgerError> {
        let account = self.resolve(tenant_id, id).await?;
        match account.posting_refusal() {
            None => Ok(account),
            Some(reason) => Err(LedgerError::validation(format!(
                "account {} ({}) {}",
                account.account_code, id, reason
            ))),
        }
    }

    /// Archives an account; existing postings are untouched
    pub async fn archive(&self, tenant_id: TenantId, id: AccountId) -> Result<Account, LedgerError> {
        let mut account = self.resolve(tenant_id, id).await?;
        if account.archived_at.is_none() {
            account.archive(Utc::now());
            self.ledger.update_account(&account).await?;
            info!(account_id = %id, "Account archived");
        }
        Ok(account)
    }

    /// Retrieves an account by ID without a tenant check
    pub async fn get(&self, id: AccountId) -> Result<Account, LedgerError> {
        Ok(self.ledger.get_account(id).await?)
    }

    pub async fn list(&self, scope: TenantScope) -> Result<Vec<Account>, LedgerError> {
        Ok(self.ledger.list_accounts(scope).await?)
    }
}
