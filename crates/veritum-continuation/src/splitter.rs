use veritum_codec::Field;
use veritum_crypto::{PowPolicy, SigningKeyPair};
use veritum_cube::{Cube, UncompiledCube};
use veritum_types::{CubeType, Key, RelationshipType, Timestamp};

use crate::options::ContinuationOptions;
use crate::plan::plan;
use crate::ContinuationError;

/// Per-root-cube knobs the splitter cannot infer from the field list: the same ones
/// [`UncompiledCube`] exposes for chunk 0, since chunk 0 is compiled as `cube_type`
/// rather than as a plain continuation target.
#[derive(Default)]
pub struct RootParams {
    pub notify: Option<Key>,
    pub date: Option<Timestamp>,
    pub signing_key: Option<SigningKeyPair>,
    pub update_count: Option<u32>,
}

/// Splits `fields` across one or more Cubes under `options`.
///
/// Chunk 0 is compiled as `cube_type`, carrying whatever notify/date/signing/update-count
/// parameters `root` supplies. Every continuation chunk is compiled as a plain `FROZEN`
/// Cube: a continuation target needs no identity beyond its own content hash, since chunk
/// 0's `CONTINUED_IN` references address it by key (`SPEC_FULL.md` §4.4).
///
/// Finalizes bottom-up, per the reference design's step 5: chunks `1..k-1` are compiled
/// first so their keys exist, then chunk 0's `CONTINUED_IN` placeholders are back-filled
/// with those keys and chunk 0 is compiled last.
pub fn split(
    fields: Vec<Field>,
    cube_type: CubeType,
    options: &ContinuationOptions,
    pow: PowPolicy,
    root: RootParams,
) -> Result<Vec<Cube>, ContinuationError> {
    let planned = plan(fields, options)?;

    let mut tail_cubes = Vec::with_capacity(planned.chunks.len().saturating_sub(1));
    for chunk_fields in planned.chunks.iter().skip(1) {
        let cube = UncompiledCube::new(CubeType::Frozen, chunk_fields.clone()).compile(pow)?;
        tail_cubes.push(cube);
    }

    let mut root_fields = planned.chunks[0].clone();
    for (&placeholder_idx, cube) in planned.ref_positions.iter().zip(tail_cubes.iter()) {
        let mut value = vec![RelationshipType::ContinuedIn.as_byte()];
        value.extend_from_slice(cube.key().as_bytes());
        root_fields[placeholder_idx] = Field::new(root_fields[placeholder_idx].field_type, value);
    }

    let mut builder = UncompiledCube::new(cube_type, root_fields);
    if let Some(notify) = root.notify {
        builder = builder.with_notify(notify);
    }
    if let Some(date) = root.date {
        builder = builder.with_date(date);
    }
    if let Some(signing_key) = root.signing_key {
        builder = builder.with_signing_key(signing_key);
    }
    if let Some(update_count) = root.update_count {
        builder = builder.with_update_count(update_count);
    }
    let root_cube = builder.compile(pow)?;

    let mut cubes = Vec::with_capacity(tail_cubes.len() + 1);
    cubes.push(root_cube);
    cubes.extend(tail_cubes);
    Ok(cubes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(bytes: &[u8]) -> Field {
        Field::new(veritum_types::FieldType::Payload, bytes.to_vec())
    }

    #[test]
    fn small_payload_splits_into_single_cube() {
        let options = ContinuationOptions::default();
        let cubes = split(vec![payload(b"hello")], CubeType::Frozen, &options, PowPolicy::new(0), RootParams::default())
            .unwrap();
        assert_eq!(cubes.len(), 1);
    }

    #[test]
    fn oversized_payload_splits_and_links_continuation() {
        let options = ContinuationOptions::default();
        let data = vec![b'A'; 1400];
        let cubes = split(vec![payload(&data)], CubeType::Frozen, &options, PowPolicy::new(0), RootParams::default())
            .unwrap();
        assert_eq!(cubes.len(), 2);

        let root_fields = cubes[0].fields().unwrap();
        let relates_to = root_fields
            .iter()
            .find(|f| f.field_type == veritum_types::FieldType::RelatesTo)
            .expect("root carries a CONTINUED_IN reference");
        assert_eq!(relates_to.value[0], RelationshipType::ContinuedIn.as_byte());
        assert_eq!(&relates_to.value[1..], cubes[1].key().as_bytes());
    }

    #[test]
    fn three_chunk_split_links_both_continuations_in_order() {
        let options = ContinuationOptions::default();
        let data = vec![b'B'; 3000];
        let cubes = split(vec![payload(&data)], CubeType::Frozen, &options, PowPolicy::new(0), RootParams::default())
            .unwrap();
        assert_eq!(cubes.len(), 3);

        let root_fields = cubes[0].fields().unwrap();
        let refs: Vec<_> = root_fields.iter().filter(|f| f.field_type == veritum_types::FieldType::RelatesTo).collect();
        assert_eq!(refs.len(), 2);
        assert_eq!(&refs[0].value[1..], cubes[1].key().as_bytes());
        assert_eq!(&refs[1].value[1..], cubes[2].key().as_bytes());
    }

    #[test]
    fn root_cube_type_is_preserved_for_signed_types() {
        let options = ContinuationOptions::default();
        let signing_key = SigningKeyPair::generate();
        let root = RootParams { signing_key: Some(signing_key), ..RootParams::default() };
        let cubes = split(vec![payload(b"hi")], CubeType::Muc, &options, PowPolicy::new(0), root).unwrap();
        assert_eq!(cubes[0].cube_type(), CubeType::Muc);
        cubes[0].verify_signature().unwrap();
    }
}
