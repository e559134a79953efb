//! Public types re-exported from the internal crates.

// Values
pub use tabula_core::{Symbol, Value};

// Rows
pub use tabula_core::{AllData, AttributeRecord, Data, Slot, TypeTag};

// Schema
pub use tabula_core::{Column, ColumnType, Schema, DEFAULT_KEY_LENGTH};

// Storage seam
pub use tabula_storage::{MemoryBackend, QueryLog, Relational, StorageError, TableHandle};
#[cfg(feature = "sqlite")]
pub use tabula_storage::SqliteBackend;

// Codec
pub use tabula_codec::{classify, decode, encode, CodecError, MAX_DEPTH};
