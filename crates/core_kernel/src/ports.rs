//! Ports and Adapters Infrastructure
//!
//! Foundational types for the hexagonal layout used by every domain crate.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    interface_api (axum)                      │
//! │        services, posting engine, ledger queries              │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Port Traits                             │
//! │   (TenantPort, LedgerPort, InvoicePort, InventoryPort)       │
//! │   Defined in each domain, depend only on core_kernel         │
//! └─────────────────────────────────────────────────────────────┘
//!                    ▲                         ▲
//!                    │                         │
//!         ┌─────────┴─────────┐     ┌────────┴────────┐
//!         │  Postgres adapter │     │ In-memory adapter│
//!         │     (infra_db)    │     │ (per domain crate)│
//!         └───────────────────┘     └──────────────────┘
//! ```
//!
//! ```rust,ignore
//! // In domain_tenant/src/ports.rs
//! #[async_trait]
//! pub trait TenantPort: DomainPort + HealthCheckable {
//!     async fn get_tenant(&self, id: TenantId) -> Result<Tenant, PortError>;
//! }
//! ```

use std::fmt;
use thiserror::Error;
use serde::{Deserialize, Serialize};

/// Error type for port operations
///
/// Every adapter, database-backed or in-memory, reports failures through
/// this type.
#[derive(Debug, Error)]
pub enum PortError {
    /// The requested entity was not found
    #[error("Not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: String,
        id: String,
    },

    /// A validation error occurred
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    /// The operation conflicts with existing data
    #[error("Conflict: {message}")]
    Conflict {
        message: String,
    },

    /// Connection to the underlying system failed
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The operation timed out
    #[error("Timeout after {duration_ms}ms: {operation}")]
    Timeout {
        operation: String,
        duration_ms: u64,
    },

    /// An internal error occurred
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PortError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Creates a Validation error with field information
    pub fn validation_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        PortError::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Creates a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict {
            message: message.into(),
        }
    }

    /// Creates a Connection error
    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Returns true if this error indicates a transient failure
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. } | PortError::Timeout { .. })
    }

    /// Returns true if this error indicates the entity was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    /// Returns true if this error indicates a uniqueness or version conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }
}

/// Marker trait for all domain ports
///
/// All port traits extend this marker so they can be shared across
/// async tasks behind an `Arc<dyn ...>`.
pub trait DomainPort: Send + Sync + 'static {}

/// Health status for an adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    /// Adapter is healthy and operational
    Healthy,
    /// Adapter is degraded but operational
    Degraded,
    /// Adapter is unhealthy and not operational
    Unhealthy,
    /// Health status is unknown
    Unknown,
}

/// Health check result for an adapter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckResult {
    /// Adapter identifier
    pub adapter_id: String,
    /// Current health status
    pub status: AdapterHealth,
    /// Latency of the health check in milliseconds
    pub latency_ms: u64,
    /// Optional message with additional details
    pub message: Option<String>,
    /// Timestamp of the health check
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

impl HealthCheckResult {
    /// A healthy result stamped now
    pub fn healthy(adapter_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Healthy,
            latency_ms,
            message: None,
            checked_at: chrono::Utc::now(),
        }
    }

    /// An unhealthy result carrying the failure message
    pub fn unhealthy(adapter_id: impl Into<String>, latency_ms: u64, message: impl Into<String>) -> Self {
        Self {
            adapter_id: adapter_id.into(),
            status: AdapterHealth::Unhealthy,
            latency_ms,
            message: Some(message.into()),
            checked_at: chrono::Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

/// Trait for adapters that support health checks
#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    /// Performs a health check on the adapter
    async fn health_check(&self) -> HealthCheckResult;
}
