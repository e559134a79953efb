//! Storage errors
//!
//! Backend failures are surfaced to callers as-is; nothing here retries.

use thiserror::Error;

/// Errors reported by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The physical table does not exist
    #[error("no such table: {0}")]
    NoSuchTable(String),

    /// Table name cannot be used as an identifier
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A row violates the table schema
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// A stored row cannot be read back
    #[error("corrupt row in {table}: {reason}")]
    CorruptRow {
        /// Table holding the row
        table: String,
        /// What is wrong with it
        reason: String,
    },

    /// SQLite driver error
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Blocking storage task failed to complete
    #[error("storage task failed: {0}")]
    Task(String),
}
