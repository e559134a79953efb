//! Core types for Tabula
//!
//! This crate defines the data model shared by every other crate:
//! - [`Value`]: the dynamic payload stored under a key
//! - [`Symbol`]: symbolic identifiers and the process-wide symbol registry
//! - [`TypeTag`] and [`AttributeRecord`]: the persisted row shape
//! - [`Schema`]: the fixed column layout every table instantiates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod schema;
pub mod symbol;
pub mod types;
pub mod value;

pub use schema::{Column, ColumnType, Schema, DEFAULT_KEY_LENGTH};
pub use symbol::Symbol;
pub use types::{AllData, AttributeRecord, Data, Slot, TagError, TypeTag};
pub use value::Value;
