//! Database error types

use core_kernel::PortError;
use thiserror::Error;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Entity not found in database
    #[error("{entity} with id '{id}' not found")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation
    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    /// Foreign key constraint violation
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Optimistic version check failed
    #[error("Version conflict: {0}")]
    VersionConflict(String),

    /// Migration error
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be mapped back to a domain type
    #[error("Could not decode stored value: {0}")]
    Decode(String),

    /// Pool exhaustion - no available connections
    #[error("Connection pool exhausted")]
    PoolExhausted,
}

impl DatabaseError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        DatabaseError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn decode(message: impl std::fmt::Display) -> Self {
        DatabaseError::Decode(message.to_string())
    }

    /// Classifies a PostgreSQL error by its SQLSTATE
    ///
    /// `22003` (numeric value out of range) is a constraint of the column
    /// type, reported like a failed check.
    pub fn from_sqlstate(code: Option<&str>, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            Some("23505") => DatabaseError::DuplicateEntry(message),
            Some("23503") => DatabaseError::ForeignKeyViolation(message),
            Some("23514") | Some("22003") => DatabaseError::ConstraintViolation(message),
            _ => DatabaseError::QueryFailed(message),
        }
    }

    /// Checks if this error indicates a record was not found
    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound { .. })
    }

    /// Checks if this error is a constraint violation
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            DatabaseError::DuplicateEntry(_)
                | DatabaseError::ForeignKeyViolation(_)
                | DatabaseError::ConstraintViolation(_)
        )
    }

    /// Checks if this error is a connection-related issue
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted
        )
    }
}

/// Maps SQLx errors by PostgreSQL error code
///
/// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>.
impl From<sqlx::Error> for DatabaseError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => DatabaseError::not_found("Record", "unknown"),
            sqlx::Error::PoolTimedOut => DatabaseError::PoolExhausted,
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) | sqlx::Error::PoolClosed => {
                DatabaseError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => {
                DatabaseError::from_sqlstate(db_err.code().as_deref(), db_err.message())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                DatabaseError::Decode(error.to_string())
            }
            _ => DatabaseError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationFailed(error.to_string())
    }
}

/// Translation at the port boundary
///
/// - `NotFound` -> `PortError::NotFound`
/// - duplicates and version conflicts -> `PortError::Conflict`
/// - other constraint violations -> `PortError::Validation`
/// - connection problems -> `PortError::Connection`
/// - everything else -> `PortError::Internal`
impl From<DatabaseError> for PortError {
    fn from(error: DatabaseError) -> Self {
        match error {
            DatabaseError::NotFound { entity, id } => PortError::NotFound {
                entity_type: entity,
                id,
            },
            DatabaseError::DuplicateEntry(message) | DatabaseError::VersionConflict(message) => {
                PortError::conflict(message)
            }
            DatabaseError::ForeignKeyViolation(message)
            | DatabaseError::ConstraintViolation(message) => PortError::validation(message),
            e @ (DatabaseError::ConnectionFailed(_) | DatabaseError::PoolExhausted) => {
                PortError::connection(e.to_string())
            }
            other => PortError::internal(other.to_string()),
        }
    }
}
