//! Value → attribute record

use crate::classify::classify;
use crate::error::CodecError;
use crate::pack::pack;
use tabula_core::{AttributeRecord, TypeTag, Value};

/// Encode `value` as the row stored under `key`
///
/// Exactly the slot named by the tag is populated. Fails with
/// [`CodecError::InvalidType`] when a structured value contains something
/// the packer cannot store.
pub fn encode(key: &str, value: &Value) -> Result<AttributeRecord, CodecError> {
    let tag = classify(value);
    let mut record = AttributeRecord::new(key, tag);

    match (tag, value) {
        (TypeTag::Nil | TypeTag::Und | TypeTag::Nan, _) => {}
        (TypeTag::Inf, Value::Number(n)) => record.bool = Some(*n > 0.0),
        (TypeTag::Bool, Value::Bool(b)) => record.bool = Some(*b),
        (TypeTag::Num, Value::Number(n)) => record.num = Some(*n),
        (TypeTag::Txt, Value::String(s)) => record.txt = Some(s.clone()),
        (TypeTag::Sym, Value::Symbol(sym)) => record.txt = Some(sym.description().to_string()),
        (TypeTag::Obj, _) => record.blob = Some(pack(value)?),
        _ => {
            return Err(CodecError::InvalidType {
                type_name: value.type_name(),
            })
        }
    }

    Ok(record)
}
