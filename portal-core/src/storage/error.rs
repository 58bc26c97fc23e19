//! Storage Errors
//!
//! `TigerStyle`: Explicit error types with context.
//!
//! "Not found" is never an error: lookups return `Ok(None)`.

use thiserror::Error;

use crate::model::EntityKind;

/// Errors from storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A unique key is already taken (parent email, business identifier)
    #[error("{entity} already exists: {key}")]
    AlreadyExists {
        /// Kind of record that collided
        entity: EntityKind,
        /// The colliding key
        key: String,
    },

    /// A referenced record does not exist
    #[error("referenced {entity} does not exist: {id}")]
    InvalidReference {
        /// Kind of the missing record
        entity: EntityKind,
        /// Surrogate id that was referenced
        id: i64,
    },

    /// The backend refused the operation
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// Backend message
        message: String,
    },

    /// Connection error
    #[error("connection error: {message}")]
    Connection {
        /// Connection error message
        message: String,
    },

    /// Timeout error
    #[error("timeout after {duration_ms}ms")]
    Timeout {
        /// Duration in milliseconds
        duration_ms: u64,
    },

    /// Query error
    #[error("query error: {message}")]
    Query {
        /// Query error message
        message: String,
    },

    /// A write may or may not have been applied (connection lost during commit)
    #[error("outcome unknown: {message}")]
    Indeterminate {
        /// What was lost
        message: String,
    },

    /// Backend misconfigured
    #[error("configuration error: {message}")]
    Configuration {
        /// What is wrong
        message: String,
    },

    /// Internal error
    #[error("internal error: {message}")]
    Internal {
        /// Error message
        message: String,
    },
}

impl StorageError {
    /// Create an already exists error.
    #[must_use]
    pub fn already_exists(entity: EntityKind, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.into(),
        }
    }

    /// Create an invalid reference error.
    #[must_use]
    pub fn invalid_reference(entity: EntityKind, id: i64) -> Self {
        Self::InvalidReference { entity, id }
    }

    /// Create a permission error.
    #[must_use]
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    #[must_use]
    pub fn timeout(duration_ms: u64) -> Self {
        Self::Timeout { duration_ms }
    }

    /// Create a query error.
    #[must_use]
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create an indeterminate-outcome error.
    #[must_use]
    pub fn indeterminate(message: impl Into<String>) -> Self {
        Self::Indeterminate {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a transient error (can be retried).
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::Timeout { .. })
    }

    /// Check if this is a uniqueness conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
