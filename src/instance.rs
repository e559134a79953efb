//! Table registry and data access.
//!
//! An [`Instance`] keeps the set of live tables, forwards every read and
//! write to its relational backend through the type-tag codec, and reports
//! what happened on its event bus.
//!
//! The registry is the only authority on whether a table exists. A table the
//! backend still holds but this instance never created (or already dropped)
//! is reported as [`Error::NotFound`].

use crate::config::{BackendConfig, Config};
use crate::error::{Error, Result};
use crate::events::{Change, EventBus, EventKind, ListenerId};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tabula_codec::{decode, decode_row, encode};
use tabula_core::{AllData, Data, Schema, Value};
use tabula_storage::{FindOptions, QueryLog, Relational, SyncOptions, TableHandle};
use tracing::{debug, info, warn};

/// Predicate applied to decoded rows by [`Instance::all`].
pub type Filter = Box<dyn Fn(&AllData) -> bool + Send + Sync>;

/// Options for [`Instance::all`].
///
/// `offset` and `limit` are applied by the backend before `filter` runs, so
/// a page may hold fewer than `limit` matches.
///
/// # Example
///
/// ```ignore
/// let page = AllOptions::new()
///     .limit(50)
///     .filter(|row| row.key.starts_with("user:"));
/// ```
#[derive(Default)]
pub struct AllOptions {
    /// Keep only rows for which this returns `true`; `None` keeps all
    pub filter: Option<Filter>,
    /// Rows to skip
    pub offset: Option<usize>,
    /// Maximum rows to read
    pub limit: Option<usize>,
}

impl AllOptions {
    /// No filter, no pagination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter.
    pub fn filter(mut self, filter: impl Fn(&AllData) -> bool + Send + Sync + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Set the offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set the limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl fmt::Debug for AllOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllOptions")
            .field("filter", &self.filter.is_some())
            .field("offset", &self.offset)
            .field("limit", &self.limit)
            .finish()
    }
}

/// A set of named key-value tables over one relational backend.
///
/// # Example
///
/// ```ignore
/// use tabula::prelude::*;
///
/// let db = Instance::builder().memory().open()?;
/// db.create("main").await?;
/// db.set("main", "answer", 42).await?;
///
/// let data = db.get("main", "answer").await?;
/// assert_eq!(data.map(|d| d.value), Some(Value::from(42)));
/// ```
pub struct Instance {
    backend: Arc<dyn Relational>,
    tables: RwLock<FxHashMap<String, Arc<dyn TableHandle>>>,
    bus: Arc<EventBus>,
    config: Config,
}

impl Instance {
    /// Wrap an already opened backend.
    ///
    /// `config.backend` is ignored; the given backend is used as-is.
    pub fn with_backend(backend: Arc<dyn Relational>, config: Config) -> Self {
        debug!(backend = backend.name(), benchmark = config.benchmark, "instance ready");
        Self {
            backend,
            tables: RwLock::new(FxHashMap::default()),
            bus: Arc::new(EventBus::new()),
            config,
        }
    }

    /// Open the backend described by `config`.
    pub fn open(config: Config) -> Result<Self> {
        config.validate()?;
        let backend = config.backend.open()?;
        Ok(Self::with_backend(backend, config))
    }

    /// An instance over a fresh in-memory backend with default settings.
    pub fn memory() -> Self {
        Self::with_backend(
            Arc::new(tabula_storage::MemoryBackend::new()),
            Config::default(),
        )
    }

    /// Create a builder for instance configuration.
    pub fn builder() -> InstanceBuilder {
        InstanceBuilder::new()
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Backend name, e.g. `"memory"` or `"sqlite"`.
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Check if `table` is registered.
    pub fn has_table(&self, table: &str) -> bool {
        self.tables.read().contains_key(table)
    }

    /// Registered table names, sorted.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.read().keys().cloned().collect();
        names.sort();
        names
    }

    // =========================================================================
    // Table lifecycle
    // =========================================================================

    /// Create `table`, replacing any physical table of the same name.
    ///
    /// Fails with [`Error::AlreadyExists`] if this instance already holds it.
    pub async fn create(&self, table: &str) -> Result<()> {
        if self.has_table(table) {
            return Err(Error::AlreadyExists(table.to_string()));
        }

        let schema = Schema::attribute_with_key_length(table, self.config.max_key_length);
        let handle = self.backend.define(schema)?;
        handle
            .sync(SyncOptions { force: true }, &self.query_log("CREATE TABLE"))
            .await?;

        self.register(table, handle);
        info!(table, backend = self.backend.name(), "created table");
        self.bus.emit_change(&Change::Create(table.to_string()));
        Ok(())
    }

    /// Drop `table` and its physical storage.
    ///
    /// The table is unregistered before the backend is asked to destroy it,
    /// so it stays unregistered even if that fails.
    pub async fn drop(&self, table: &str) -> Result<()> {
        let handle = self
            .unregister(table)
            .ok_or_else(|| Error::NotFound(table.to_string()))?;

        if let Err(e) = handle.drop_table(&self.query_log("DROP TABLE")).await {
            warn!(table, error = %e, "table unregistered but backend drop failed");
            return Err(e.into());
        }

        info!(table, "dropped table");
        self.bus.emit_change(&Change::Drop(table.to_string()));
        Ok(())
    }

    /// Delete every row of `table`.
    pub async fn truncate(&self, table: &str) -> Result<()> {
        let handle = self.handle(table)?;
        handle.truncate(&self.query_log("TRUNCATE TABLE")).await?;

        debug!(table, "truncated table");
        self.bus.emit_change(&Change::Truncate(table.to_string()));
        Ok(())
    }

    // =========================================================================
    // Data access
    // =========================================================================

    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// Returns `Some(true)` if a row was overwritten, `Some(false)` on a
    /// fresh insert and `None` if the backend cannot tell.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if `table` is not registered
    /// - [`Error::InvalidKey`] if `key` is longer than `max_key_length`
    /// - [`Error::InvalidType`] if `value` nests a symbol
    pub async fn set(&self, table: &str, key: &str, value: impl Into<Value>) -> Result<Option<bool>> {
        let value = value.into();
        let handle = self.handle(table)?;
        self.check_key(key)?;

        let record = encode(key, &value)?;
        let types = record.types;
        let (_, updated) = handle
            .upsert(record, &self.query_log("UPSERT DATA"))
            .await?;

        debug!(table, key, %types, ?updated, "set");
        self.bus.emit_change(&Change::Set {
            key: key.to_string(),
            updated,
        });
        Ok(updated)
    }

    /// Read the value stored under `key`, `None` if there is none.
    pub async fn get(&self, table: &str, key: &str) -> Result<Option<Data>> {
        let handle = self.handle(table)?;
        let row = handle
            .find_by_key(key, &self.query_log("FIND ONE"))
            .await?;

        let data = decode_row(row.as_ref())?;
        debug!(table, key, found = data.is_some(), "get");
        Ok(data)
    }

    /// List rows of `table` in storage order.
    ///
    /// See [`AllOptions`] for how pagination and filtering combine.
    pub async fn all(&self, table: &str, options: AllOptions) -> Result<Vec<AllData>> {
        let handle = self.handle(table)?;
        let find = FindOptions {
            limit: options.limit,
            offset: options.offset,
        };
        let rows = handle.find_all(find, &self.query_log("FIND ALL")).await?;

        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            let item = AllData::from(decode(row)?);
            if options.filter.as_ref().map_or(true, |keep| keep(&item)) {
                out.push(item);
            }
        }

        debug!(table, read = rows.len(), kept = out.len(), "all");
        Ok(out)
    }

    /// Delete the row stored under `key`.
    ///
    /// Returns `true` if a row was removed. A change event is emitted either
    /// way.
    pub async fn delete(&self, table: &str, key: &str) -> Result<bool> {
        let handle = self.handle(table)?;
        let removed = handle
            .destroy(key, &self.query_log("DELETE DATA"))
            .await?;

        debug!(table, key, removed, "delete");
        self.bus.emit_change(&Change::Delete(key.to_string()));
        Ok(removed > 0)
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Subscribe to change events.
    pub fn on_change(&self, listener: impl Fn(&Change) + Send + Sync + 'static) -> ListenerId {
        self.bus.on_change(Arc::new(listener))
    }

    /// Subscribe to debug events.
    ///
    /// Debug events are only produced while `benchmark` is enabled.
    pub fn on_debug(&self, listener: impl Fn(&str) + Send + Sync + 'static) -> ListenerId {
        self.bus.on_debug(Arc::new(listener))
    }

    /// Unsubscribe a listener. Returns `false` if it was not subscribed.
    pub fn off(&self, id: ListenerId) -> bool {
        self.bus.off(id)
    }

    /// Unsubscribe every listener of one kind.
    pub fn remove_all_listeners(&self, kind: EventKind) {
        self.bus.remove_all(kind)
    }

    /// Number of listeners of one kind.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.bus.count(kind)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn handle(&self, table: &str) -> Result<Arc<dyn TableHandle>> {
        self.tables
            .read()
            .get(table)
            .cloned()
            .ok_or_else(|| Error::NotFound(table.to_string()))
    }

    fn register(&self, table: &str, handle: Arc<dyn TableHandle>) {
        self.tables.write().insert(table.to_string(), handle);
    }

    fn unregister(&self, table: &str) -> Option<Arc<dyn TableHandle>> {
        self.tables.write().remove(table)
    }

    fn check_key(&self, key: &str) -> Result<()> {
        let len = key.chars().count();
        if len > self.config.max_key_length {
            return Err(Error::InvalidKey(format!(
                "key is {} characters, limit is {}",
                len, self.config.max_key_length
            )));
        }
        Ok(())
    }

    /// Per-statement hook that turns timings into debug events
    fn query_log(&self, label: &'static str) -> QueryLog {
        if !self.config.benchmark {
            return QueryLog::disabled();
        }
        let bus = Arc::clone(&self.bus);
        QueryLog::new(move |query, elapsed| {
            bus.emit_debug(&format!(
                "{}\nFinished in {}ms\n{}",
                label,
                elapsed.as_millis(),
                query
            ));
        })
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("backend", &self.backend.name())
            .field("tables", &self.tables())
            .field("bus", &self.bus)
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for instance configuration.
///
/// # Example
///
/// ```ignore
/// // Persistent
/// let db = Instance::builder().sqlite("./data.sqlite").open()?;
///
/// // Scratch, without debug events
/// let db = Instance::builder().memory().benchmark(false).open()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct InstanceBuilder {
    config: Config,
}

impl InstanceBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Use the in-memory backend (default).
    pub fn memory(mut self) -> Self {
        self.config.backend = BackendConfig::Memory;
        self
    }

    /// Use a SQLite database file.
    pub fn sqlite(mut self, path: impl AsRef<Path>) -> Self {
        self.config.backend = BackendConfig::Sqlite {
            path: Some(path.as_ref().to_path_buf()),
        };
        self
    }

    /// Use a private in-memory SQLite database.
    pub fn sqlite_in_memory(mut self) -> Self {
        self.config.backend = BackendConfig::Sqlite { path: None };
        self
    }

    /// Enable or disable debug events.
    pub fn benchmark(mut self, enabled: bool) -> Self {
        self.config.benchmark = enabled;
        self
    }

    /// Set the key length bound.
    pub fn max_key_length(mut self, max: usize) -> Self {
        self.config.max_key_length = max;
        self
    }

    /// Open the instance.
    pub fn open(self) -> Result<Instance> {
        Instance::open(self.config)
    }
}
