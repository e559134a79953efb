//! SQLite backend
//!
//! One `rusqlite` connection shared by every table defined from the same
//! [`SqliteBackend`]. Statements run on the blocking pool via
//! `tokio::task::spawn_blocking`, so callers must be inside a Tokio runtime.
//!
//! # DDL
//!
//! | Column type | SQLite |
//! |-------------|--------|
//! | `String(n)` | `VARCHAR(n)` |
//! | `Char(n)` | `CHAR(n)` |
//! | `Boolean` | `BOOLEAN` |
//! | `Double` | `DOUBLE PRECISION` |
//! | `Text` | `TEXT` |
//! | `Blob` | `BLOB` |
//!
//! SQLite does not enforce `VARCHAR` bounds, so the key bound is checked
//! before every upsert.

use crate::error::StorageError;
use crate::relational::{
    check_key, page_bound, validate_identifier, FindOptions, QueryLog, Relational, SyncOptions,
    TableHandle,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tabula_core::{AttributeRecord, Column, ColumnType, Schema, TypeTag};

/// SQLite-backed relational store
///
/// # Example
///
/// ```ignore
/// use tabula_storage::SqliteBackend;
///
/// let backend = SqliteBackend::open("./data.sqlite")?;
/// let scratch = SqliteBackend::open_in_memory()?;
/// ```
#[derive(Clone)]
pub struct SqliteBackend {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl SqliteBackend {
    /// Open (or create) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open(&path)?;
        tracing::debug!(path = %path.display(), "opened sqlite database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        tracing::debug!("opened in-memory sqlite database");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Database file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("path", &self.path)
            .finish()
    }
}

impl Relational for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn define(&self, schema: Schema) -> Result<Arc<dyn TableHandle>, StorageError> {
        validate_identifier(&schema.table)?;
        Ok(Arc::new(SqliteTable {
            conn: Arc::clone(&self.conn),
            quoted: quote(&schema.table),
            schema,
        }))
    }
}

struct SqliteTable {
    conn: Arc<Mutex<Connection>>,
    schema: Schema,
    quoted: String,
}

impl SqliteTable {
    /// Run `f` against the connection on the blocking pool
    ///
    /// `sql` is what gets reported to the log; it is only reported when `f`
    /// succeeds.
    async fn run<T, F>(&self, sql: String, log: &QueryLog, f: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> Result<T, StorageError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let log = log.clone();
        tokio::task::spawn_blocking(move || {
            // guard dropped before the hook runs
            let (result, elapsed) = {
                let conn = conn.lock();
                let started = Instant::now();
                let result = f(&conn, &sql);
                (result, started.elapsed())
            };
            if result.is_ok() {
                log.record(&sql, elapsed);
            }
            result
        })
        .await
        .map_err(|e| StorageError::Task(e.to_string()))?
    }

    fn select_columns(&self) -> String {
        self.schema
            .column_names()
            .iter()
            .map(|name| quote(name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn create_sql(&self) -> String {
        let columns: Vec<String> = self.schema.columns.iter().map(column_sql).collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.quoted,
            columns.join(", ")
        )
    }
}

#[async_trait]
impl TableHandle for SqliteTable {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    async fn sync(&self, options: SyncOptions, log: &QueryLog) -> Result<(), StorageError> {
        let mut sql = String::new();
        if options.force {
            sql.push_str(&format!("DROP TABLE IF EXISTS {}; ", self.quoted));
        }
        sql.push_str(&self.create_sql());

        self.run(sql, log, |conn, sql| {
            conn.execute_batch(sql)?;
            Ok(())
        })
        .await
    }

    async fn drop_table(&self, log: &QueryLog) -> Result<(), StorageError> {
        let sql = format!("DROP TABLE IF EXISTS {};", self.quoted);
        self.run(sql, log, |conn, sql| {
            conn.execute(sql, [])?;
            Ok(())
        })
        .await
    }

    async fn truncate(&self, log: &QueryLog) -> Result<(), StorageError> {
        let sql = format!("DELETE FROM {};", self.quoted);
        self.run(sql, log, |conn, sql| {
            conn.execute(sql, [])?;
            Ok(())
        })
        .await
    }

    async fn upsert(
        &self,
        record: AttributeRecord,
        log: &QueryLog,
    ) -> Result<(AttributeRecord, Option<bool>), StorageError> {
        check_key(&self.schema, &record.key)?;

        let exists_sql = format!("SELECT 1 FROM {} WHERE \"key\" = ?1", self.quoted);
        let sql = format!(
            "INSERT INTO {} (\"key\", \"types\", \"bool\", \"num\", \"txt\", \"blob\") \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
             ON CONFLICT (\"key\") DO UPDATE SET \
             \"types\" = excluded.\"types\", \"bool\" = excluded.\"bool\", \
             \"num\" = excluded.\"num\", \"txt\" = excluded.\"txt\", \"blob\" = excluded.\"blob\";",
            self.quoted
        );

        self.run(sql, log, move |conn, sql| {
            let existed = conn
                .query_row(&exists_sql, params![record.key], |_| Ok(()))
                .optional()?
                .is_some();
            conn.execute(
                sql,
                params![
                    record.key,
                    record.types.as_char().to_string(),
                    record.bool,
                    record.num,
                    record.txt,
                    record.blob,
                ],
            )?;
            Ok((record, Some(existed)))
        })
        .await
    }

    async fn find_by_key(
        &self,
        key: &str,
        log: &QueryLog,
    ) -> Result<Option<AttributeRecord>, StorageError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE \"key\" = ?1;",
            self.select_columns(),
            self.quoted
        );
        let key = key.to_string();
        let table = self.schema.table.clone();

        self.run(sql, log, move |conn, sql| {
            let raw = conn
                .query_row(sql, params![key], RawRow::read)
                .optional()?;
            raw.map(|raw| raw.into_record(&table)).transpose()
        })
        .await
    }

    async fn find_all(
        &self,
        options: FindOptions,
        log: &QueryLog,
    ) -> Result<Vec<AttributeRecord>, StorageError> {
        let mut sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            self.select_columns(),
            self.quoted
        );
        if options.limit.is_some() || options.offset.is_some() {
            let limit = options.limit.map_or(-1, page_bound);
            let offset = options.offset.map_or(0, page_bound);
            sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
        }
        sql.push(';');
        let table = self.schema.table.clone();

        self.run(sql, log, move |conn, sql| {
            let mut stmt = conn.prepare(sql)?;
            let raws = stmt
                .query_map([], RawRow::read)?
                .collect::<Result<Vec<_>, _>>()?;
            raws.into_iter()
                .map(|raw| raw.into_record(&table))
                .collect()
        })
        .await
    }

    async fn destroy(&self, key: &str, log: &QueryLog) -> Result<u64, StorageError> {
        let sql = format!("DELETE FROM {} WHERE \"key\" = ?1;", self.quoted);
        let key = key.to_string();
        self.run(sql, log, move |conn, sql| {
            let removed = conn.execute(sql, params![key])?;
            Ok(removed as u64)
        })
        .await
    }
}

/// Row as SQLite hands it back, before the tag is parsed
struct RawRow {
    key: String,
    types: Option<String>,
    bool: Option<bool>,
    num: Option<f64>,
    txt: Option<String>,
    blob: Option<Vec<u8>>,
}

impl RawRow {
    fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get(0)?,
            types: row.get(1)?,
            bool: row.get(2)?,
            num: row.get(3)?,
            txt: row.get(4)?,
            blob: row.get(5)?,
        })
    }

    fn into_record(self, table: &str) -> Result<AttributeRecord, StorageError> {
        let corrupt = |reason: String| StorageError::CorruptRow {
            table: table.to_string(),
            reason,
        };
        let types = self
            .types
            .ok_or_else(|| corrupt(format!("row {:?} has no type tag", self.key)))?;
        let types: TypeTag = types
            .parse()
            .map_err(|e| corrupt(format!("row {:?}: {}", self.key, e)))?;

        Ok(AttributeRecord {
            key: self.key,
            types,
            bool: self.bool,
            num: self.num,
            txt: self.txt,
            blob: self.blob,
        })
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn column_sql(column: &Column) -> String {
    let ty = match column.column_type {
        ColumnType::String { length } => format!("VARCHAR({})", length),
        ColumnType::Char { length } => format!("CHAR({})", length),
        ColumnType::Boolean => "BOOLEAN".to_string(),
        ColumnType::Double => "DOUBLE PRECISION".to_string(),
        ColumnType::Text => "TEXT".to_string(),
        ColumnType::Blob => "BLOB".to_string(),
    };
    let mut sql = format!("{} {}", quote(column.name), ty);
    if !column.nullable {
        sql.push_str(" NOT NULL");
    }
    if column.primary_key {
        sql.push_str(" PRIMARY KEY");
    }
    sql
}
