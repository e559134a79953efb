//! Convenient imports for Tabula.
//!
//! ```ignore
//! use tabula::prelude::*;
//!
//! let db = Instance::memory();
//! db.create("main").await?;
//! ```

// Main entry point
pub use crate::instance::{AllOptions, Instance, InstanceBuilder};
pub use crate::config::{BackendConfig, Config};

// Error handling
pub use crate::error::{Error, Result};

// Events
pub use crate::events::{Change, ChangeOp, EventKind, ListenerId};

// Core types
pub use crate::types::{AllData, Data, Symbol, TypeTag, Value};

// Backends
pub use crate::types::MemoryBackend;
#[cfg(feature = "sqlite")]
pub use crate::types::SqliteBackend;
