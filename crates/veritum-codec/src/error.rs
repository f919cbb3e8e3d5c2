use thiserror::Error;
use veritum_types::FieldType;

/// Errors raised while compiling or decompiling a field list into a 1024-byte blob.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("field list does not start with the required leading positionals for this cube type")]
    MissingLeadingPositionals,

    #[error("field list does not end with the required trailing positionals for this cube type")]
    MissingTrailingPositionals,

    #[error("positional field {field_type:?} has length {actual}, expected {expected}")]
    WrongPositionalLength { field_type: FieldType, expected: usize, actual: usize },

    #[error("payload region overflowed: {needed} bytes needed, {available} available")]
    FieldSizeError { needed: usize, available: usize },

    #[error("unexpected end of blob while decoding a TLV field header or value")]
    UnexpectedEof,

    #[error("TLV header referenced unknown field type code {code}")]
    InvalidFieldType { code: u8 },

    #[error("blob length is {actual}, expected exactly {expected}")]
    WrongBlobLength { expected: usize, actual: usize },
}
