//! Type-tag codec for Tabula
//!
//! This crate flattens a [`Value`](tabula_core::Value) into an
//! [`AttributeRecord`](tabula_core::AttributeRecord) and rebuilds it again.
//!
//! ## Encoding Rules
//!
//! | Value | Tag | Slot |
//! |-------|-----|------|
//! | `Null` | NIL | - |
//! | `Undefined` | UND | - |
//! | `Number(NaN)` | NAN | - |
//! | `Number(±Inf)` | INF | `bool` = positive |
//! | `Bool` | BOOL | `bool` |
//! | `Number` (finite) | NUM | `num` |
//! | `String` | TXT | `txt` |
//! | `Symbol` | SYM | `txt` = label |
//! | `Bytes` / `Array` / `Object` | OBJ | `blob` = MessagePack |
//!
//! ## Examples
//!
//! ```
//! use tabula_codec::{decode, encode};
//! use tabula_core::{TypeTag, Value};
//!
//! let record = encode("answer", &Value::from(42)).unwrap();
//! assert_eq!(record.types, TypeTag::Num);
//! assert_eq!(record.num, Some(42.0));
//!
//! let data = decode(&record).unwrap();
//! assert_eq!(data.value, Value::from(42));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod classify;
mod decode;
mod encode;
mod error;
mod pack;

pub use classify::classify;
pub use decode::{decode, decode_row};
pub use encode::encode;
pub use error::CodecError;
pub use pack::{pack, unpack, MAX_DEPTH};
