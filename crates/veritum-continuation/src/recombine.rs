use veritum_codec::{merge_adjacent, Field};
use veritum_cube::Cube;
use veritum_types::{FieldType, RelationshipType};

use crate::ContinuationError;

/// Reassembles the field list for a continuation chain.
///
/// `cubes[0]` is the root, `cubes[1..]` are its continuation targets in address order
/// (the order chunk 0's `CONTINUED_IN` fan-out lists them, `SPEC_FULL.md` §4.4). Each
/// Cube's own positionals describe that Cube's framing, not the recombined payload, so
/// they are dropped along with any `CONTINUED_IN` reference; the remaining payload fields
/// are concatenated chunk by chunk, re-merged across the chunk boundary the same way a
/// single Cube's own TLV payload merges on decompile, and the splitter-inserted `PADDING`
/// separators are stripped last.
pub fn recombine(cubes: &[Cube]) -> Result<Vec<Field>, ContinuationError> {
    if cubes.is_empty() {
        return Err(ContinuationError::EmptyChunkList);
    }

    let mut payload = Vec::new();
    for cube in cubes {
        for field in cube.fields()? {
            if field.field_type.is_positional() {
                continue;
            }
            if field.field_type == FieldType::RelatesTo
                && field.value.first().copied() == Some(RelationshipType::ContinuedIn.as_byte())
            {
                continue;
            }
            payload.push(field);
        }
    }

    let merged = merge_adjacent(payload);
    Ok(merged.into_iter().filter(|f| f.field_type != FieldType::Padding).collect())
}
