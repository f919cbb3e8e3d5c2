use veritum_types::FieldType;

/// One decoded field: a type tag plus its raw value bytes.
///
/// Positional fields always carry exactly `field_type.fixed_length()` bytes. TLV fields
/// carry whatever the header declared. [`FieldType::Remainder`] is synthetic — it is
/// produced by [`crate::decompile`] for trailing unparsed bytes and is always dropped on
/// the next [`crate::compile`] (see `SPEC_FULL.md` §4.1 edge cases).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub field_type: FieldType,
    pub value: Vec<u8>,
}

impl Field {
    #[must_use]
    pub fn new(field_type: FieldType, value: impl Into<Vec<u8>>) -> Self {
        Self { field_type, value: value.into() }
    }

    /// Bytes this field occupies once written into a blob: header (0, 1, or 2 bytes,
    /// depending on whether it is positional, fixed-TLV, or variable-TLV) plus value.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        crate::header::header_len(self.field_type) + self.value.len()
    }
}
