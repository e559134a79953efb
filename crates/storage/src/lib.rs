//! Relational storage backends for Tabula
//!
//! This crate is the seam between the table registry and whatever actually
//! persists rows. The registry only talks to the traits in [`relational`]:
//! - [`Relational`]: defines a table schema and hands back a handle
//! - [`TableHandle`]: sync/drop/truncate plus row-level upsert, lookup,
//!   listing and delete
//! - [`QueryLog`]: optional `(query, elapsed)` hook fired per statement
//!
//! Two backends ship with the crate:
//! - [`MemoryBackend`]: process-local tables, used for tests and caching
//! - [`SqliteBackend`]: SQLite through `rusqlite` (feature `sqlite`)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod memory;
pub mod relational;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use error::StorageError;
pub use memory::MemoryBackend;
pub use relational::{FindOptions, QueryHook, QueryLog, Relational, SyncOptions, TableHandle};
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;
