use veritum_types::FieldType;

use crate::definition::FieldDefinition;
use crate::field::Field;
use crate::header::{decode_header, encode_header, header_len};
use crate::CodecError;

/// Encodes `fields` into a `blob_size`-byte blob per `def`.
///
/// `fields` must start with `def.leading` (in order, matching lengths) and end with
/// `def.trailing` (likewise); everything in between is written as the TLV payload region
/// in list order. [`FieldType::Remainder`] entries, if present, are dropped — they are a
/// decompile-only artifact and never round-trip back into a blob.
pub fn compile(fields: &[Field], def: &FieldDefinition, blob_size: usize) -> Result<Vec<u8>, CodecError> {
    if fields.len() < def.leading.len() + def.trailing.len() {
        return Err(CodecError::MissingLeadingPositionals);
    }

    let leading = &fields[..def.leading.len()];
    let trailing = &fields[fields.len() - def.trailing.len()..];
    let middle = &fields[def.leading.len()..fields.len() - def.trailing.len()];

    let mut blob = vec![0u8; blob_size];
    let mut cursor = 0usize;
    for (expected_type, field) in def.leading.iter().zip(leading) {
        write_positional(&mut blob, &mut cursor, *expected_type, field, CodecError::MissingLeadingPositionals)?;
    }

    let trailing_start = blob_size
        .checked_sub(def.trailing_len())
        .ok_or(CodecError::FieldSizeError { needed: def.trailing_len(), available: blob_size })?;

    for field in middle {
        if field.field_type == def.remainder {
            continue;
        }
        let header = encode_header(field.field_type, field.value.len())?;
        let total = header.len() + field.value.len();
        if cursor + total > trailing_start {
            return Err(CodecError::FieldSizeError { needed: total, available: trailing_start - cursor });
        }
        blob[cursor..cursor + header.len()].copy_from_slice(&header);
        cursor += header.len();
        blob[cursor..cursor + field.value.len()].copy_from_slice(&field.value);
        cursor += field.value.len();
    }

    if cursor + header_len(def.stop) <= trailing_start {
        let stop_header = encode_header(def.stop, 0)?;
        blob[cursor..cursor + stop_header.len()].copy_from_slice(&stop_header);
        cursor += stop_header.len();
    }
    // Remaining bytes stay zeroed; each decodes as a one-byte PADDING_SINGLEBYTE marker.
    let _ = cursor;

    let mut trailing_cursor = trailing_start;
    for (expected_type, field) in def.trailing.iter().zip(trailing) {
        write_positional(&mut blob, &mut trailing_cursor, *expected_type, field, CodecError::MissingTrailingPositionals)?;
    }

    Ok(blob)
}

fn write_positional(
    blob: &mut [u8],
    cursor: &mut usize,
    expected_type: FieldType,
    field: &Field,
    mismatch_err: CodecError,
) -> Result<(), CodecError> {
    if field.field_type != expected_type {
        return Err(mismatch_err);
    }
    let len = expected_type.fixed_length().unwrap_or(field.value.len());
    if field.value.len() != len {
        return Err(CodecError::WrongPositionalLength {
            field_type: expected_type,
            expected: len,
            actual: field.value.len(),
        });
    }
    blob[*cursor..*cursor + len].copy_from_slice(&field.value);
    *cursor += len;
    Ok(())
}

/// Decodes `blob` into a field list per `def`, the inverse of [`compile`] modulo the
/// synthetic [`FieldType::Remainder`] tail and the merging of adjacent same-type
/// variable-length fields (`SPEC_FULL.md` §4.1).
pub fn decompile(blob: &[u8], def: &FieldDefinition) -> Result<Vec<Field>, CodecError> {
    let trailing_start = blob
        .len()
        .checked_sub(def.trailing_len())
        .ok_or(CodecError::WrongBlobLength { expected: def.trailing_len(), actual: blob.len() })?;

    let mut leading = Vec::with_capacity(def.leading.len());
    let mut cursor = 0usize;
    for field_type in &def.leading {
        let len = field_type.fixed_length().unwrap_or(0);
        let value = blob.get(cursor..cursor + len).ok_or(CodecError::UnexpectedEof)?.to_vec();
        leading.push(Field::new(*field_type, value));
        cursor += len;
    }

    let mut payload = Vec::new();
    while cursor < trailing_start {
        let (field_type, header_len, value_len) = decode_header(blob, cursor)?;
        if cursor + header_len + value_len > trailing_start {
            return Err(CodecError::UnexpectedEof);
        }
        if field_type == def.stop {
            cursor += header_len + value_len;
            break;
        }
        let value = blob[cursor + header_len..cursor + header_len + value_len].to_vec();
        payload.push(Field::new(field_type, value));
        cursor += header_len + value_len;
    }
    if cursor < trailing_start {
        payload.push(Field::new(def.remainder, blob[cursor..trailing_start].to_vec()));
    }

    let mut trailing = Vec::with_capacity(def.trailing.len());
    let mut trailing_cursor = trailing_start;
    for field_type in &def.trailing {
        let len = field_type.fixed_length().unwrap_or(0);
        let value = blob.get(trailing_cursor..trailing_cursor + len).ok_or(CodecError::UnexpectedEof)?.to_vec();
        trailing.push(Field::new(*field_type, value));
        trailing_cursor += len;
    }

    let mut result = leading;
    result.extend(merge_adjacent(payload));
    result.extend(trailing);
    Ok(result)
}

/// Merges runs of adjacent same-type variable-length fields. A `PADDING` field (or any
/// other field) sitting between two same-type fields breaks the run, which is exactly how
/// the continuation splitter marks "do not rejoin" (`SPEC_FULL.md` §4.1 edge cases).
pub fn merge_adjacent(fields: Vec<Field>) -> Vec<Field> {
    let mut merged: Vec<Field> = Vec::with_capacity(fields.len());
    for field in fields {
        if let Some(last) = merged.last_mut() {
            if last.field_type == field.field_type && field.field_type.is_variable_length() {
                last.value.extend_from_slice(&field.value);
                continue;
            }
        }
        merged.push(field);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritum_types::CubeType;

    fn frozen_def() -> FieldDefinition {
        FieldDefinition::for_cube_type(CubeType::Frozen)
    }

    fn build_fields(payload: &[u8]) -> Vec<Field> {
        vec![
            Field::new(FieldType::Type, vec![CubeType::Frozen.as_byte()]),
            Field::new(FieldType::Payload, payload.to_vec()),
            Field::new(FieldType::Date, vec![0u8; 5]),
            Field::new(FieldType::Nonce, vec![0u8; 4]),
        ]
    }

    #[test]
    fn compile_decompile_roundtrip() {
        let def = frozen_def();
        let fields = build_fields(b"hello");
        let blob = compile(&fields, &def, 1024).unwrap();
        assert_eq!(blob.len(), 1024);
        let decoded = decompile(&blob, &def).unwrap();
        // Drop the synthetic Remainder before comparing.
        let decoded: Vec<_> = decoded.into_iter().filter(|f| f.field_type != FieldType::Remainder).collect();
        assert_eq!(decoded, fields);
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let def = frozen_def();
        let fields = build_fields(&vec![b'A'; 2000]);
        assert!(matches!(compile(&fields, &def, 1024), Err(CodecError::FieldSizeError { .. })));
    }

    #[test]
    fn adjacent_same_type_fields_merge_without_padding() {
        let def = frozen_def();
        let mut fields = vec![Field::new(FieldType::Type, vec![CubeType::Frozen.as_byte()])];
        fields.push(Field::new(FieldType::Payload, b"foo".to_vec()));
        fields.push(Field::new(FieldType::Payload, b"bar".to_vec()));
        fields.push(Field::new(FieldType::Date, vec![0u8; 5]));
        fields.push(Field::new(FieldType::Nonce, vec![0u8; 4]));
        let blob = compile(&fields, &def, 1024).unwrap();
        let decoded = decompile(&blob, &def).unwrap();
        let payloads: Vec<_> = decoded.iter().filter(|f| f.field_type == FieldType::Payload).collect();
        assert_eq!(payloads.len(), 1);
        assert_eq!(payloads[0].value, b"foobar");
    }

    #[test]
    fn padding_field_inhibits_merge() {
        let def = frozen_def();
        let mut fields = vec![Field::new(FieldType::Type, vec![CubeType::Frozen.as_byte()])];
        fields.push(Field::new(FieldType::Payload, b"foo".to_vec()));
        fields.push(Field::new(FieldType::Padding, Vec::new()));
        fields.push(Field::new(FieldType::Payload, b"bar".to_vec()));
        fields.push(Field::new(FieldType::Date, vec![0u8; 5]));
        fields.push(Field::new(FieldType::Nonce, vec![0u8; 4]));
        let blob = compile(&fields, &def, 1024).unwrap();
        let decoded = decompile(&blob, &def).unwrap();
        let payloads: Vec<_> = decoded.iter().filter(|f| f.field_type == FieldType::Payload).collect();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].value, b"foo");
        assert_eq!(payloads[1].value, b"bar");
    }

    #[test]
    fn wrong_blob_length_is_rejected() {
        let def = frozen_def();
        assert!(decompile(&[0u8; 10], &def).is_err());
    }
}
