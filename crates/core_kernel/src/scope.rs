//! Tenant scoping for list queries
//!
//! Every list operation on a port takes a `TenantScope` instead of an
//! optional tenant filter, so "all tenants" is always an explicit choice.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identifiers::TenantId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "scope", content = "tenantId")]
pub enum TenantScope {
    /// Rows belonging to a single tenant
    Tenant(TenantId),
    /// Rows of every tenant
    All,
}

impl TenantScope {
    /// Builds a scope from an optional request filter
    pub fn from_filter(tenant_id: Option<TenantId>) -> Self {
        match tenant_id {
            Some(id) => TenantScope::Tenant(id),
            None => TenantScope::All,
        }
    }

    /// Returns true if a row owned by `tenant_id` is visible in this scope
    pub fn matches(&self, tenant_id: TenantId) -> bool {
        match self {
            TenantScope::Tenant(id) => *id == tenant_id,
            TenantScope::All => true,
        }
    }

    /// The concrete tenant, if any
    pub fn tenant(&self) -> Option<TenantId> {
        match self {
            TenantScope::Tenant(id) => Some(*id),
            TenantScope::All => None,
        }
    }
}

impl From<TenantId> for TenantScope {
    fn from(id: TenantId) -> Self {
        TenantScope::Tenant(id)
    }
}

impl fmt::Display for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantScope::Tenant(id) => write!(f, "{}", id),
            TenantScope::All => write!(f, "all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filter() {
        let id = TenantId::new();
        assert_eq!(TenantScope::from_filter(Some(id)), TenantScope::Tenant(id));
        assert_eq!(TenantScope::from_filter(None), TenantScope::All);
    }

    #[test]
    fn test_matches() {
        let mine = TenantId::new();
        let other = TenantId::new();
        assert!(TenantScope::Tenant(mine).matches(mine));
        assert!(!TenantScope::Tenant(mine).matches(other));
        assert!(TenantScope::All.matches(other));
    }
}
