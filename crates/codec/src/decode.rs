//! Attribute record → value

use crate::error::CodecError;
use crate::pack::unpack;
use tabula_core::{AttributeRecord, Data, Slot, Symbol, TypeTag, Value};

/// Decode a stored row back into its key/value pair
pub fn decode(record: &AttributeRecord) -> Result<Data, CodecError> {
    let missing = |slot| CodecError::MissingSlot {
        tag: record.types,
        slot,
    };

    let value = match record.types {
        TypeTag::Nil => Value::Null,
        TypeTag::Und => Value::Undefined,
        TypeTag::Nan => Value::Number(f64::NAN),
        TypeTag::Inf => match record.bool.ok_or_else(|| missing(Slot::Bool))? {
            true => Value::Number(f64::INFINITY),
            false => Value::Number(f64::NEG_INFINITY),
        },
        TypeTag::Bool => Value::Bool(record.bool.ok_or_else(|| missing(Slot::Bool))?),
        TypeTag::Num => Value::Number(record.num.ok_or_else(|| missing(Slot::Num))?),
        TypeTag::Txt => Value::String(record.txt.clone().ok_or_else(|| missing(Slot::Txt))?),
        TypeTag::Sym => {
            let label = record.txt.as_deref().ok_or_else(|| missing(Slot::Txt))?;
            Value::Symbol(Symbol::resolve(label))
        }
        TypeTag::Obj => unpack(record.blob.as_deref().ok_or_else(|| missing(Slot::Blob))?)?,
    };

    Ok(Data {
        key: record.key.clone(),
        value,
    })
}

/// Decode the result of a key lookup
///
/// A missing row yields `None`; no record is fabricated for it.
pub fn decode_row(record: Option<&AttributeRecord>) -> Result<Option<Data>, CodecError> {
    record.map(decode).transpose()
}
