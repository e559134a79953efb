//! In-memory backend
//!
//! Tables live in a shared `DashMap<name, BTreeMap<key, row>>`. Every handle
//! defined from the same [`MemoryBackend`] sees the same tables, the way
//! models defined on one connection share a database.
//!
//! Storage order is key order. Query text reported to the [`QueryLog`] is a
//! SQL-shaped description of what was done.

use crate::error::StorageError;
use crate::relational::{
    check_key, page_bound, validate_identifier, FindOptions, QueryLog, Relational, SyncOptions,
    TableHandle,
};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tabula_core::{AttributeRecord, Schema};

type Rows = BTreeMap<String, AttributeRecord>;

/// Process-local relational store
///
/// Cloning shares the underlying tables.
///
/// # Example
///
/// ```ignore
/// use tabula_storage::{MemoryBackend, Relational};
/// use tabula_core::Schema;
///
/// let backend = MemoryBackend::new();
/// let table = backend.define(Schema::attribute("main"))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<DashMap<String, Rows>>,
}

impl MemoryBackend {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a physical table exists
    pub fn has_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Number of physical tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of rows in a physical table
    pub fn row_count(&self, name: &str) -> Option<usize> {
        self.tables.get(name).map(|rows| rows.len())
    }
}

impl Relational for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn define(&self, schema: Schema) -> Result<Arc<dyn TableHandle>, StorageError> {
        validate_identifier(&schema.table)?;
        Ok(Arc::new(MemoryTable {
            tables: Arc::clone(&self.tables),
            schema,
        }))
    }
}

struct MemoryTable {
    tables: Arc<DashMap<String, Rows>>,
    schema: Schema,
}

impl MemoryTable {
    fn name(&self) -> &str {
        &self.schema.table
    }

    fn missing(&self) -> StorageError {
        StorageError::NoSuchTable(self.name().to_string())
    }
}

#[async_trait]
impl TableHandle for MemoryTable {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn sync(&self, options: SyncOptions, log: &QueryLog) -> Result<(), StorageError> {
        let mut query = String::new();
        if options.force {
            query.push_str(&format!("DROP TABLE IF EXISTS {}; ", self.name()));
        }
        query.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name(),
            self.schema.column_names().join(", ")
        ));

        log.timed(&query, || -> Result<_, StorageError> {
            if options.force {
                self.tables.insert(self.name().to_string(), Rows::new());
            } else {
                self.tables
                    .entry(self.name().to_string())
                    .or_insert_with(Rows::new);
            }
            Ok(())
        })
    }

    async fn drop_table(&self, log: &QueryLog) -> Result<(), StorageError> {
        let query = format!("DROP TABLE IF EXISTS {};", self.name());
        log.timed(&query, || -> Result<_, StorageError> {
            self.tables.remove(self.name());
            Ok(())
        })
    }

    async fn truncate(&self, log: &QueryLog) -> Result<(), StorageError> {
        let query = format!("DELETE FROM {};", self.name());
        log.timed(&query, || -> Result<_, StorageError> {
            let mut rows = self.tables.get_mut(self.name()).ok_or_else(|| self.missing())?;
            rows.clear();
            Ok(())
        })
    }

    async fn upsert(
        &self,
        record: AttributeRecord,
        log: &QueryLog,
    ) -> Result<(AttributeRecord, Option<bool>), StorageError> {
        check_key(&self.schema, &record.key)?;
        let query = format!(
            "UPSERT INTO {} (key, types) VALUES ({:?}, '{}');",
            self.name(),
            record.key,
            record.types.as_char()
        );
        log.timed(&query, || -> Result<_, StorageError> {
            let mut rows = self.tables.get_mut(self.name()).ok_or_else(|| self.missing())?;
            let previous = rows.insert(record.key.clone(), record.clone());
            Ok((record, Some(previous.is_some())))
        })
    }

    async fn find_by_key(
        &self,
        key: &str,
        log: &QueryLog,
    ) -> Result<Option<AttributeRecord>, StorageError> {
        let query = format!("SELECT * FROM {} WHERE key = {:?};", self.name(), key);
        log.timed(&query, || -> Result<_, StorageError> {
            let rows = self.tables.get(self.name()).ok_or_else(|| self.missing())?;
            Ok(rows.get(key).cloned())
        })
    }

    async fn find_all(
        &self,
        options: FindOptions,
        log: &QueryLog,
    ) -> Result<Vec<AttributeRecord>, StorageError> {
        let mut query = format!("SELECT * FROM {}", self.name());
        if let Some(limit) = options.limit {
            query.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = options.offset {
            query.push_str(&format!(" OFFSET {}", offset));
        }
        query.push(';');

        log.timed(&query, || -> Result<_, StorageError> {
            let rows = self.tables.get(self.name()).ok_or_else(|| self.missing())?;
            Ok(rows
                .values()
                .skip(options.offset.map_or(0, page_bound) as usize)
                .take(options.limit.map_or(i64::MAX, page_bound) as usize)
                .cloned()
                .collect())
        })
    }

    async fn destroy(&self, key: &str, log: &QueryLog) -> Result<u64, StorageError> {
        let query = format!("DELETE FROM {} WHERE key = {:?} LIMIT 1;", self.name(), key);
        log.timed(&query, || -> Result<_, StorageError> {
            let mut rows = self.tables.get_mut(self.name()).ok_or_else(|| self.missing())?;
            Ok(rows.remove(key).map_or(0, |_| 1))
        })
    }
}
