//! Binary packer for structured values
//!
//! Structured values are written as MessagePack through a private mirror of
//! [`Value`]. The mirror has no symbol variant: a symbol's identity only
//! lives in this process, so a symbol nested inside a structured value is
//! rejected instead of being silently flattened to its label.
//!
//! Arrays and objects may nest at most [`MAX_DEPTH`] levels deep. Anything
//! deeper is refused by [`pack`], so every blob it produces can be unpacked
//! again.

use crate::error::CodecError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tabula_core::Value;

/// Deepest array/object nesting [`pack`] accepts
pub const MAX_DEPTH: usize = 128;

#[derive(Serialize, Deserialize)]
enum Packed<'a> {
    Nil,
    Undefined,
    Bool(bool),
    Number(f64),
    Text(Cow<'a, str>),
    Bytes(Cow<'a, [u8]>),
    Array(Vec<Packed<'a>>),
    Map(BTreeMap<Cow<'a, str>, Packed<'a>>),
}

impl<'a> Packed<'a> {
    /// `depth` is the number of containers enclosing `value`
    fn from_value(value: &'a Value, depth: usize) -> Result<Self, CodecError> {
        Ok(match value {
            Value::Null => Packed::Nil,
            Value::Undefined => Packed::Undefined,
            Value::Bool(b) => Packed::Bool(*b),
            Value::Number(n) => Packed::Number(*n),
            Value::String(s) => Packed::Text(Cow::Borrowed(s.as_str())),
            Value::Bytes(b) => Packed::Bytes(Cow::Borrowed(b.as_slice())),
            Value::Array(items) => {
                let depth = descend(depth)?;
                Packed::Array(
                    items
                        .iter()
                        .map(|item| Packed::from_value(item, depth))
                        .collect::<Result<_, _>>()?,
                )
            }
            Value::Object(map) => {
                let depth = descend(depth)?;
                Packed::Map(
                    map.iter()
                        .map(|(k, v)| Ok((Cow::Borrowed(k.as_str()), Packed::from_value(v, depth)?)))
                        .collect::<Result<_, CodecError>>()?,
                )
            }
            Value::Symbol(_) => {
                return Err(CodecError::InvalidType {
                    type_name: value.type_name(),
                })
            }
        })
    }

    fn into_value(self) -> Value {
        match self {
            Packed::Nil => Value::Null,
            Packed::Undefined => Value::Undefined,
            Packed::Bool(b) => Value::Bool(b),
            Packed::Number(n) => Value::Number(n),
            Packed::Text(s) => Value::String(s.into_owned()),
            Packed::Bytes(b) => Value::Bytes(b.into_owned()),
            Packed::Array(items) => Value::Array(items.into_iter().map(Packed::into_value).collect()),
            Packed::Map(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k.into_owned(), v.into_value()))
                    .collect(),
            ),
        }
    }
}

fn descend(depth: usize) -> Result<usize, CodecError> {
    let depth = depth + 1;
    if depth > MAX_DEPTH {
        return Err(CodecError::Pack(format!(
            "value nests deeper than {} levels",
            MAX_DEPTH
        )));
    }
    Ok(depth)
}

/// Pack a structured value into bytes
///
/// Fails with [`CodecError::Pack`] if arrays/objects nest deeper than
/// [`MAX_DEPTH`].

pub fn pack(value: &Value) -> Result<Vec<u8>, CodecError> {
    let packed = Packed::from_value(value, 0)?;
    rmp_serde::to_vec(&packed).map_err(|e| CodecError::Pack(e.to_string()))
}

/// Unpack bytes produced by [`pack`]
pub fn unpack(bytes: &[u8]) -> Result<Value, CodecError> {
    let packed: Packed<'_> =
        rmp_serde::from_slice(bytes).map_err(|e| CodecError::Unpack(e.to_string()))?;
    Ok(packed.into_value())
}
