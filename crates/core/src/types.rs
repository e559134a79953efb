//! Row-level types
//!
//! - [`TypeTag`]: which of the nine value categories a row holds
//! - [`Slot`]: the value column a tag stores into
//! - [`AttributeRecord`]: the persisted row
//! - [`Data`] / [`AllData`]: the caller-facing decoded pairs

use crate::value::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Type tag of a stored value
///
/// The numeric codes are persisted (as a single character) and must not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeTag {
    /// null
    Nil = 0,
    /// undefined / absent
    Und = 1,
    /// not-a-number
    Nan = 2,
    /// ±infinity, sign in the `bool` slot
    Inf = 3,
    /// boolean
    Bool = 4,
    /// finite number
    Num = 5,
    /// text
    Txt = 6,
    /// symbol, label in the `txt` slot
    Sym = 7,
    /// structured value, packed into the `blob` slot
    Obj = 8,
}

impl TypeTag {
    /// All tags in code order
    pub const ALL: [TypeTag; 9] = [
        TypeTag::Nil,
        TypeTag::Und,
        TypeTag::Nan,
        TypeTag::Inf,
        TypeTag::Bool,
        TypeTag::Num,
        TypeTag::Txt,
        TypeTag::Sym,
        TypeTag::Obj,
    ];

    /// Persisted numeric code
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Persisted character form (`'0'..='8'`)
    pub fn as_char(self) -> char {
        (b'0' + self.code()) as char
    }

    /// Parse a numeric code
    pub fn from_code(code: u8) -> Result<Self, TagError> {
        Self::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| TagError(code.to_string()))
    }

    /// Parse the persisted character form
    pub fn from_char(c: char) -> Result<Self, TagError> {
        match c.to_digit(10) {
            Some(d) => Self::from_code(d as u8),
            None => Err(TagError(c.to_string())),
        }
    }

    /// The slot this tag stores into, `None` for tags without payload
    pub fn slot(self) -> Option<Slot> {
        match self {
            TypeTag::Nil | TypeTag::Und | TypeTag::Nan => None,
            TypeTag::Inf | TypeTag::Bool => Some(Slot::Bool),
            TypeTag::Num => Some(Slot::Num),
            TypeTag::Txt | TypeTag::Sym => Some(Slot::Txt),
            TypeTag::Obj => Some(Slot::Blob),
        }
    }

    /// Short upper-case name
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Nil => "NIL",
            TypeTag::Und => "UND",
            TypeTag::Nan => "NAN",
            TypeTag::Inf => "INF",
            TypeTag::Bool => "BOOL",
            TypeTag::Num => "NUM",
            TypeTag::Txt => "TXT",
            TypeTag::Sym => "SYM",
            TypeTag::Obj => "OBJ",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TypeTag {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c),
            _ => Err(TagError(s.to_string())),
        }
    }
}

/// Unrecognized persisted type tag
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown type tag: {0:?}")]
pub struct TagError(pub String);

/// Value column of an attribute record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// `bool` column
    Bool,
    /// `num` column
    Num,
    /// `txt` column
    Txt,
    /// `blob` column
    Blob,
}

impl Slot {
    /// Column name
    pub fn column(self) -> &'static str {
        match self {
            Slot::Bool => "bool",
            Slot::Num => "num",
            Slot::Txt => "txt",
            Slot::Blob => "blob",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Persisted row: one per key
///
/// At most one slot is populated, and it is the one named by
/// `types.slot()`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRecord {
    /// Primary key
    pub key: String,
    /// Type tag
    pub types: TypeTag,
    /// Boolean slot (BOOL, INF sign)
    pub bool: Option<bool>,
    /// Numeric slot (NUM)
    pub num: Option<f64>,
    /// Text slot (TXT, SYM label)
    pub txt: Option<String>,
    /// Binary slot (OBJ)
    pub blob: Option<Vec<u8>>,
}

impl AttributeRecord {
    /// Create a record with every slot empty
    pub fn new(key: impl Into<String>, types: TypeTag) -> Self {
        Self {
            key: key.into(),
            types,
            bool: None,
            num: None,
            txt: None,
            blob: None,
        }
    }

    /// Slots that currently hold a value
    pub fn populated_slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        if self.bool.is_some() {
            slots.push(Slot::Bool);
        }
        if self.num.is_some() {
            slots.push(Slot::Num);
        }
        if self.txt.is_some() {
            slots.push(Slot::Txt);
        }
        if self.blob.is_some() {
            slots.push(Slot::Blob);
        }
        slots
    }

    /// Check the slot invariant against the tag
    pub fn is_consistent(&self) -> bool {
        let populated = self.populated_slots();
        match self.types.slot() {
            None => populated.is_empty(),
            Some(slot) => populated == [slot],
        }
    }
}

/// Decoded key/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    /// Key
    pub key: String,
    /// Decoded value
    pub value: Value,
}

impl Data {
    /// Create a pair
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Element returned by a table listing
#[derive(Debug, Clone, PartialEq)]
pub struct AllData {
    /// Key, same as `data.key`
    pub key: String,
    /// Decoded pair
    pub data: Data,
}

impl From<Data> for AllData {
    fn from(data: Data) -> Self {
        Self {
            key: data.key.clone(),
            data,
        }
    }
}
