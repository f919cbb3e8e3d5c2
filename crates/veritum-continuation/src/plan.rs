use std::collections::HashMap;

use veritum_codec::{header_len, Field};
use veritum_types::{FieldType, Key, RelationshipType};

use crate::options::{ContinuationOptions, MIN_CHUNK};
use crate::ContinuationError;

/// Byte length of a `CONTINUED_IN` reference field once encoded: a fixed 33-byte
/// `RELATES_TO` value (1-byte relationship tag + 32-byte key) plus its 1-byte TLV header.
pub const CONTINUED_IN_ENCODED_LEN: usize = 1 + 1 + 32;

fn continued_in_placeholder() -> Field {
    let mut value = vec![RelationshipType::ContinuedIn.as_byte()];
    value.extend_from_slice(Key::ZERO.as_bytes());
    Field::new(FieldType::RelatesTo, value)
}

/// A planned layout: one field list per chunk (without positionals — those are added by
/// the facade when it finalizes each chunk into a Cube), plus the positions of the
/// `CONTINUED_IN` placeholders inside chunk 0 in chunk-address order (placeholder `i`
/// addresses `chunks[i + 1]`).
pub struct Plan {
    pub chunks: Vec<Vec<Field>>,
    pub ref_positions: Vec<usize>,
}

/// Packs `worklist` into the minimum number of chunks under `options`, inserting
/// `CONTINUED_IN` placeholders (flat, at the head of chunk 0) whenever more than one
/// chunk is needed.
///
/// This plans chunk *boundaries* directly via a small fixed-point simulation rather than
/// literally replaying the reference design's insert-ref-then-rewind walk over a mutable
/// linked worklist: both converge on the same chunk count and field placement, and a
/// closed-form boundary pass is the more idiomatic shape once the continuation structure
/// is a flat `Vec`-backed arena rather than a list a node can be spliced into mid-walk.
pub fn plan(fields: Vec<Field>, options: &ContinuationOptions) -> Result<Plan, ContinuationError> {
    let mut mapped_all = Vec::new();
    let mut mapped_by_chunk: HashMap<usize, Vec<Field>> = HashMap::new();
    let mut worklist = Vec::new();

    for field in fields {
        if options.exclude.contains(&field.field_type) {
            continue;
        }
        if field.field_type == FieldType::RelatesTo
            && field.value.first().copied() == Some(RelationshipType::ContinuedIn.as_byte())
        {
            continue; // strip any pre-existing continuation references
        }
        match options.map_field_to_chunk.get(&field.field_type) {
            Some(-1) => mapped_all.push(field),
            Some(idx) if *idx >= 0 => mapped_by_chunk.entry(*idx as usize).or_default().push(field),
            _ => worklist.push(field),
        }
    }

    // Insert a minimal PADDING separator between adjacent same-type variable-length
    // fields so the codec's merge-on-decompile doesn't rejoin independent fields.
    let mut separated = Vec::with_capacity(worklist.len());
    for field in worklist {
        if let Some(prev) = separated.last() {
            let prev: &Field = prev;
            if prev.field_type == field.field_type && field.field_type.is_variable_length() {
                separated.push(Field::new(FieldType::Padding, Vec::new()));
            }
        }
        separated.push(field);
    }
    let worklist = separated;

    if worklist.is_empty() && mapped_all.is_empty() && mapped_by_chunk.is_empty() {
        return Err(ContinuationError::NoFieldsToSplit);
    }

    // Fixed point: the number of refs chunk 0 must reserve space for depends on the
    // chunk count, which depends on how much space chunk 0 has left after reserving
    // for refs. Ref payloads are tiny relative to a chunk, so this converges in a
    // handful of iterations; cap it generously as a non-termination backstop.
    let mut ref_count = 0usize;
    let mut chunks = pack_once(&worklist, options, ref_count, &mapped_all, &mapped_by_chunk)?;
    for _ in 0..32 {
        let needed = chunks.len().saturating_sub(1);
        if needed == ref_count {
            break;
        }
        ref_count = needed;
        chunks = pack_once(&worklist, options, ref_count, &mapped_all, &mapped_by_chunk)?;
    }

    if ref_count > 0 {
        let mut head: Vec<Field> = (0..ref_count).map(|_| continued_in_placeholder()).collect();
        head.extend(chunks[0].drain(..));
        chunks[0] = head;
    }
    let ref_positions: Vec<usize> = (0..ref_count).collect();

    Ok(Plan { chunks, ref_positions })
}

fn pack_once(
    worklist: &[Field],
    options: &ContinuationOptions,
    ref_count: usize,
    mapped_all: &[Field],
    mapped_by_chunk: &HashMap<usize, Vec<Field>>,
) -> Result<Vec<Vec<Field>>, ContinuationError> {
    let chunk0_reserved = ref_count * CONTINUED_IN_ENCODED_LEN;
    let mut chunks: Vec<Vec<Field>> = Vec::new();
    let new_chunk = |idx: usize| -> Vec<Field> {
        let mut fields = mapped_all.to_vec();
        if let Some(extra) = mapped_by_chunk.get(&idx) {
            fields.extend(extra.iter().cloned());
        }
        fields
    };
    chunks.push(new_chunk(0));
    let mut chunk_index = 0usize;
    let mut used: usize = chunks[0].iter().map(Field::encoded_len).sum();

    let capacity = |idx: usize| -> usize {
        let base = options.capacity_for(idx);
        if idx == 0 {
            base.saturating_sub(chunk0_reserved)
        } else {
            base
        }
    };

    for field in worklist {
        let mut remaining_value = field.value.clone();
        loop {
            if remaining_value.is_empty() {
                break;
            }
            let remaining_space = capacity(chunk_index).saturating_sub(used);
            let header = header_len(field.field_type);
            if header + remaining_value.len() <= remaining_space {
                chunks[chunk_index].push(Field::new(field.field_type, std::mem::take(&mut remaining_value)));
                used += header + chunks[chunk_index].last().unwrap().value.len();
                break;
            }
            let max_value = remaining_space.saturating_sub(header);
            if field.field_type.is_variable_length() && max_value >= MIN_CHUNK {
                let fragment: Vec<u8> = remaining_value.drain(..max_value).collect();
                let fragment_len = fragment.len();
                chunks[chunk_index].push(Field::new(field.field_type, fragment));
                used += header + fragment_len;
                chunk_index += 1;
                if chunks.len() == chunk_index {
                    chunks.push(new_chunk(chunk_index));
                    used = chunks[chunk_index].iter().map(Field::encoded_len).sum();
                } else {
                    used = chunks[chunk_index].iter().map(Field::encoded_len).sum();
                }
            } else {
                chunk_index += 1;
                if chunks.len() == chunk_index {
                    chunks.push(new_chunk(chunk_index));
                }
                used = chunks[chunk_index].iter().map(Field::encoded_len).sum();
                if capacity(chunk_index) < header + 1 {
                    return Err(ContinuationError::FieldTooLargeForAnyChunk(field.field_type));
                }
            }
        }
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(bytes: &[u8]) -> Field {
        Field::new(FieldType::Payload, bytes.to_vec())
    }

    #[test]
    fn single_small_field_fits_one_chunk() {
        let options = ContinuationOptions::default();
        let plan = plan(vec![payload(b"hello")], &options).unwrap();
        assert_eq!(plan.chunks.len(), 1);
        assert!(plan.ref_positions.is_empty());
    }

    #[test]
    fn oversized_field_spans_two_chunks_with_one_ref() {
        let options = ContinuationOptions::default();
        let data = vec![b'A'; 1400];
        let plan = plan(vec![payload(&data)], &options).unwrap();
        assert_eq!(plan.chunks.len(), 2);
        assert_eq!(plan.ref_positions.len(), 1);
    }

    #[test]
    fn three_chunk_split_for_large_payload() {
        let options = ContinuationOptions::default();
        let data = vec![b'B'; 3000];
        let plan = plan(vec![payload(&data)], &options).unwrap();
        assert_eq!(plan.chunks.len(), 3);
        assert_eq!(plan.ref_positions.len(), 2);
    }

    #[test]
    fn empty_worklist_is_rejected() {
        let options = ContinuationOptions::default();
        assert!(matches!(plan(vec![], &options), Err(ContinuationError::NoFieldsToSplit)));
    }
}
