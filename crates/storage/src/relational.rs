//! The relational collaborator contract
//!
//! A backend turns a [`Schema`] into a [`TableHandle`]. Every handle method
//! takes a [`QueryLog`]; a backend fires it once per completed statement
//! with the statement text and how long it took.

use crate::error::StorageError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tabula_core::{AttributeRecord, Schema};

/// Callback receiving `(query_text, elapsed)`
pub type QueryHook = Arc<dyn Fn(&str, Duration) + Send + Sync>;

/// Optional per-statement timing hook
#[derive(Clone, Default)]
pub struct QueryLog {
    hook: Option<QueryHook>,
}

impl QueryLog {
    /// A log that records nothing
    pub fn disabled() -> Self {
        Self { hook: None }
    }

    /// A log that forwards every statement to `hook`
    pub fn new(hook: impl Fn(&str, Duration) + Send + Sync + 'static) -> Self {
        Self {
            hook: Some(Arc::new(hook)),
        }
    }

    /// Whether a hook is attached
    pub fn is_enabled(&self) -> bool {
        self.hook.is_some()
    }

    /// Report a completed statement
    pub fn record(&self, query: &str, elapsed: Duration) {
        if let Some(hook) = &self.hook {
            hook(query, elapsed);
        }
    }

    /// Run `f`, reporting `query` with its duration if `f` succeeds
    pub fn timed<T, E>(&self, query: &str, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        if !self.is_enabled() {
            return f();
        }
        let started = Instant::now();
        let result = f();
        if result.is_ok() {
            self.record(query, started.elapsed());
        }
        result
    }
}

impl fmt::Debug for QueryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryLog")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

/// Options for [`TableHandle::sync`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Drop any existing physical table before creating it
    pub force: bool,
}

/// Options for [`TableHandle::find_all`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Maximum number of rows
    pub limit: Option<usize>,
    /// Rows to skip
    pub offset: Option<usize>,
}

/// A relational store that can define tables
pub trait Relational: Send + Sync {
    /// Short backend name for diagnostics
    fn name(&self) -> &'static str;

    /// Define `schema` and return a handle to its table
    ///
    /// Defining does not create anything; call [`TableHandle::sync`].
    fn define(&self, schema: Schema) -> Result<Arc<dyn TableHandle>, StorageError>;
}

/// Handle to one defined table
#[async_trait]
pub trait TableHandle: Send + Sync {
    /// The schema this handle was defined with
    fn schema(&self) -> &Schema;

    /// Create the physical table, dropping it first if `options.force`
    async fn sync(&self, options: SyncOptions, log: &QueryLog) -> Result<(), StorageError>;

    /// Destroy the physical table
    async fn drop_table(&self, log: &QueryLog) -> Result<(), StorageError>;

    /// Delete every row
    async fn truncate(&self, log: &QueryLog) -> Result<(), StorageError>;

    /// Insert `record`, or overwrite the row with the same key
    ///
    /// The flag is `Some(true)` if an existing row was overwritten,
    /// `Some(false)` on a fresh insert and `None` if the backend cannot tell.
    async fn upsert(
        &self,
        record: AttributeRecord,
        log: &QueryLog,
    ) -> Result<(AttributeRecord, Option<bool>), StorageError>;

    /// Look a row up by primary key
    async fn find_by_key(
        &self,
        key: &str,
        log: &QueryLog,
    ) -> Result<Option<AttributeRecord>, StorageError>;

    /// List rows in storage order, paginated by the backend
    async fn find_all(
        &self,
        options: FindOptions,
        log: &QueryLog,
    ) -> Result<Vec<AttributeRecord>, StorageError>;

    /// Delete at most one row with `key`, returning the number removed
    async fn destroy(&self, key: &str, log: &QueryLog) -> Result<u64, StorageError>;
}

/// Reject table names no backend can use
pub(crate) fn validate_identifier(name: &str) -> Result<(), StorageError> {
    if name.is_empty() || name.contains('\0') {
        return Err(StorageError::InvalidIdentifier(name.to_string()));
    }
    Ok(())
}

/// Pagination bound as a signed 64-bit count, saturating
pub(crate) fn page_bound(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Enforce the schema's key bound
pub(crate) fn check_key(schema: &Schema, key: &str) -> Result<(), StorageError> {
    match schema.key_length() {
        Some(max) if key.chars().count() > max => Err(StorageError::ConstraintViolation(format!(
            "key of {} characters exceeds {}.key length {}",
            key.chars().count(),
            schema.table,
            max
        ))),
        _ => Ok(()),
    }
}
