//! Unified error types for Tabula.
//!
//! Codec and storage failures are folded into one [`Error`] so callers
//! match on a single enum.

use tabula_codec::CodecError;
use tabula_storage::StorageError;
use thiserror::Error;

/// All Tabula errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Table is already registered
    #[error("table already exists: {0}")]
    AlreadyExists(String),

    /// Table is not registered
    #[error("table not found: {0}")]
    NotFound(String),

    /// Value has no storable form
    #[error("Invalid type given on value, got '{type_name}' instead")]
    InvalidType {
        /// Runtime type name of the offending value
        type_name: &'static str,
    },

    /// Key rejected before reaching storage
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Stored row is inconsistent with its type tag
    #[error("corruption: {0}")]
    Corruption(String),

    /// Binary packing failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration could not be loaded or is unusable
    #[error("config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Tabula operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Check if this is an already-exists error.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Error::AlreadyExists(_))
    }

    /// Check if this is an invalid-type error.
    pub fn is_invalid_type(&self) -> bool {
        matches!(self, Error::InvalidType { .. })
    }
}

// Convert from codec errors
impl From<CodecError> for Error {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::InvalidType { type_name } => Error::InvalidType { type_name },
            CodecError::MissingSlot { .. } => Error::Corruption(e.to_string()),
            CodecError::Pack(msg) | CodecError::Unpack(msg) => Error::Serialization(msg),
        }
    }
}

// Convert from TOML errors
impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
