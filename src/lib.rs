//! # Tabula
//!
//! Type-tagged key-value tables over a relational store.
//!
//! Every table has the same fixed layout: a string key, a one-character type
//! tag and four nullable value slots. Values of any supported shape (null,
//! undefined, booleans, numbers including NaN and the infinities, strings,
//! symbols and structured data) are flattened into that layout on write and
//! rebuilt on read.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tabula::prelude::*;
//!
//! let db = Instance::builder().sqlite("./data.sqlite").open()?;
//!
//! db.create("main").await?;
//! db.set("main", "greeting", "hello").await?;
//! db.set("main", "ratio", f64::NAN).await?;
//!
//! let all = db.all("main", AllOptions::new().limit(10)).await?;
//! db.delete("main", "ratio").await?;
//! db.drop("main").await?;
//! ```
//!
//! ## Events
//!
//! - [`Instance::on_change`]: one [`Change`] per successful mutation
//! - [`Instance::on_debug`]: one message per completed storage statement,
//!   while `benchmark` is enabled
//!
//! ## Crates
//!
//! - `tabula-core`: [`Value`], [`Symbol`], [`TypeTag`], [`Schema`]
//! - `tabula-codec`: value to record flattening
//! - `tabula-storage`: the backend contract plus memory and SQLite backends

#![warn(missing_docs)]

mod config;
mod error;
mod events;
mod instance;
mod types;

pub mod prelude;

// Re-export main entry points
pub use config::{BackendConfig, Config};
pub use error::{Error, Result};
pub use events::{Change, ChangeListener, ChangeOp, DebugListener, EventKind, ListenerId};
pub use instance::{AllOptions, Filter, Instance, InstanceBuilder};

// Re-export types
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Create an instance over `backend` with default settings.
///
/// # Example
///
/// ```ignore
/// let db = tabula::create(MemoryBackend::new());
/// ```
pub fn create(backend: impl Relational + 'static) -> Instance {
    Instance::with_backend(std::sync::Arc::new(backend), Config::default())
}
