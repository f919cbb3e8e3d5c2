use veritum_codec::FieldDefinition;
use veritum_types::{CubeType, Key};

/// Derives a Cube's content key from its compiled blob, per the rule for its type
/// (`SPEC_FULL.md` §6): a SHA3-256 digest for FROZEN/PIC families, or the embedded public
/// key verbatim for MUC/PMUC.
#[must_use]
pub fn derive_key(cube_type: CubeType, blob: &[u8], def: &FieldDefinition) -> Key {
    if cube_type.is_signed() {
        let offset = def
            .trailing_field_offset(veritum_types::FieldType::PublicKey, blob.len())
            .expect("signed cube types always carry a PUBLIC_KEY positional");
        let bytes = &blob[offset..offset + veritum_types::KEY_SIZE];
        return Key::from_slice(bytes).expect("PUBLIC_KEY positional is exactly KEY_SIZE bytes");
    }

    let hashed_region = if cube_type.excludes_date_nonce_from_key() {
        &blob[..blob.len() - def.date_nonce_suffix_len()]
    } else {
        blob
    };
    Key::from_bytes(veritum_crypto::sha3_256(hashed_region))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_key_is_hash_of_whole_blob() {
        let def = FieldDefinition::for_cube_type(CubeType::Frozen);
        let blob = vec![0xABu8; 1024];
        let key = derive_key(CubeType::Frozen, &blob, &def);
        assert_eq!(key, Key::from_bytes(veritum_crypto::sha3_256(&blob)));
    }

    #[test]
    fn pic_key_excludes_date_and_nonce() {
        let def = FieldDefinition::for_cube_type(CubeType::Pic);
        let mut blob_a = vec![0xABu8; 1024];
        let mut blob_b = blob_a.clone();
        // Differ only in the trailing DATE+NONCE suffix.
        blob_b[1015..].copy_from_slice(&[0xFFu8; 9]);
        assert_eq!(derive_key(CubeType::Pic, &blob_a, &def), derive_key(CubeType::Pic, &blob_b, &def));
        blob_a[0] = 0x00;
        assert_ne!(derive_key(CubeType::Pic, &blob_a, &def), derive_key(CubeType::Pic, &blob_b, &def));
    }
}
