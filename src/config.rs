//! Instance configuration.
//!
//! A [`Config`] can be built in code, through
//! [`InstanceBuilder`](crate::InstanceBuilder), or read from TOML:
//!
//! ```toml
//! benchmark = true
//! max_key_length = 1024
//!
//! [backend]
//! kind = "sqlite"
//! path = "./data.sqlite"
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tabula_core::DEFAULT_KEY_LENGTH;
use tabula_storage::{MemoryBackend, Relational};

/// Which relational backend to open.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Process-local tables
    #[default]
    Memory,
    /// SQLite database; `None` opens a private in-memory database
    Sqlite {
        /// Database file
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

impl BackendConfig {
    /// Open the configured backend.
    pub fn open(&self) -> Result<Arc<dyn Relational>> {
        match self {
            BackendConfig::Memory => Ok(Arc::new(MemoryBackend::new())),
            #[cfg(feature = "sqlite")]
            BackendConfig::Sqlite { path } => {
                let backend = match path {
                    Some(path) => tabula_storage::SqliteBackend::open(path)?,
                    None => tabula_storage::SqliteBackend::open_in_memory()?,
                };
                Ok(Arc::new(backend))
            }
            #[cfg(not(feature = "sqlite"))]
            BackendConfig::Sqlite { .. } => Err(Error::Config(
                "sqlite backend requested but the `sqlite` feature is disabled".to_string(),
            )),
        }
    }
}

/// Instance configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Storage backend
    #[serde(default)]
    pub backend: BackendConfig,

    /// Emit a debug event for every completed storage statement
    #[serde(default = "default_benchmark")]
    pub benchmark: bool,

    /// Upper bound on key length, in characters
    #[serde(default = "default_max_key_length")]
    pub max_key_length: usize,
}

fn default_benchmark() -> bool {
    true
}

fn default_max_key_length() -> usize {
    DEFAULT_KEY_LENGTH
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            benchmark: default_benchmark(),
            max_key_length: default_max_key_length(),
        }
    }
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Reject settings no instance can run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_key_length == 0 {
            return Err(Error::Config("max_key_length must be positive".to_string()));
        }
        Ok(())
    }
}
