use veritum_types::FieldType;

use crate::CodecError;

/// Bytes a field's TLV header occupies: 0 for positional fields (they have no header at
/// all, just a fixed offset), 1 for fixed-length TLV fields, 2 for variable-length ones.
#[must_use]
pub fn header_len(field_type: FieldType) -> usize {
    if field_type.is_positional() {
        0
    } else if field_type.fixed_length().is_some() {
        1
    } else {
        2
    }
}

/// Encodes a TLV header: the 6-bit type code occupies the top 6 bits of the first byte;
/// fixed-length fields stop there (length is implied by the type), variable-length
/// fields spend the remaining 2 bits of the first byte plus all of a second byte on a
/// 10-bit big-endian length.
pub fn encode_header(field_type: FieldType, value_len: usize) -> Result<Vec<u8>, CodecError> {
    let code = field_type.tlv_code().ok_or(CodecError::InvalidFieldType { code: 0 })?;
    if field_type.fixed_length().is_some() {
        return Ok(vec![code << 2]);
    }
    if value_len > 0x3FF {
        return Err(CodecError::FieldSizeError { needed: value_len, available: 0x3FF });
    }
    let first = (code << 2) | ((value_len >> 8) as u8 & 0b11);
    let second = (value_len & 0xFF) as u8;
    Ok(vec![first, second])
}

/// Decodes the TLV header starting at `blob[offset]`. Returns the field type, the total
/// header length consumed (1 or 2), and the declared value length.
pub fn decode_header(blob: &[u8], offset: usize) -> Result<(FieldType, usize, usize), CodecError> {
    let first = *blob.get(offset).ok_or(CodecError::UnexpectedEof)?;
    let code = first >> 2;
    let field_type = FieldType::from_tlv_code(code).ok_or(CodecError::InvalidFieldType { code })?;
    if let Some(fixed_len) = field_type.fixed_length() {
        Ok((field_type, 1, fixed_len))
    } else {
        let second = *blob.get(offset + 1).ok_or(CodecError::UnexpectedEof)?;
        let len = (usize::from(first & 0b11) << 8) | usize::from(second);
        Ok((field_type, 2, len))
    }
}
