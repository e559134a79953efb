//! Codec errors

use tabula_core::{Slot, TypeTag};
use thiserror::Error;

/// Errors raised while encoding or decoding attribute records
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// The value (or something nested in it) has no storable form
    #[error("Invalid type given on value, got '{type_name}' instead")]
    InvalidType {
        /// Runtime type name of the offending value
        type_name: &'static str,
    },

    /// The record's tag requires a slot that is empty
    #[error("record tagged {tag} has no value in its '{slot}' slot")]
    MissingSlot {
        /// Tag of the record
        tag: TypeTag,
        /// Slot that should be populated
        slot: Slot,
    },

    /// The binary packer rejected the value
    #[error("pack failed: {0}")]
    Pack(String),

    /// The binary slot could not be unpacked
    #[error("unpack failed: {0}")]
    Unpack(String),
}
