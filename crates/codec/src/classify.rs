//! Value classification

use tabula_core::{TypeTag, Value};

/// Classify a value into its type tag
///
/// The checks are ordered and mutually exclusive: NaN is tested before
/// infinity, and infinity before finite numbers.
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Null => TypeTag::Nil,
        Value::Undefined => TypeTag::Und,
        Value::Bool(_) => TypeTag::Bool,
        Value::Number(n) if n.is_nan() => TypeTag::Nan,
        Value::Number(n) if n.is_infinite() => TypeTag::Inf,
        Value::Number(_) => TypeTag::Num,
        Value::String(_) => TypeTag::Txt,
        Value::Symbol(_) => TypeTag::Sym,
        Value::Bytes(_) | Value::Array(_) | Value::Object(_) => TypeTag::Obj,
    }
}
