use veritum_types::{CubeType, FieldType};

/// The positional grammar for one [`CubeType`]: which fields sit at fixed offsets at the
/// front and back of the blob, and which TLV codes mark end-of-payload / unparsed
/// remainder.
///
/// One instance of this threaded through every codec call takes the place of the
/// inheritance hierarchy a class-based port would reach for (design note in
/// `SPEC_FULL.md` §9's "polymorphism" section).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    pub leading: Vec<FieldType>,
    pub trailing: Vec<FieldType>,
    pub stop: FieldType,
    pub remainder: FieldType,
}

impl FieldDefinition {
    #[must_use]
    pub fn for_cube_type(cube_type: CubeType) -> Self {
        let mut leading = vec![FieldType::Type];
        if cube_type.has_notify() {
            leading.push(FieldType::Notify);
        }

        let mut trailing = Vec::new();
        if cube_type.is_signed() {
            trailing.push(FieldType::PublicKey);
        }
        trailing.push(FieldType::Date);
        // UPDATE_COUNT sits before SIGNATURE so it falls inside the signed region;
        // only SIGNATURE and NONCE themselves are excluded from what gets signed.
        if cube_type.is_presence() {
            trailing.push(FieldType::PmucUpdateCount);
        }
        if cube_type.is_signed() {
            trailing.push(FieldType::Signature);
        }
        trailing.push(FieldType::Nonce);

        Self { leading, trailing, stop: FieldType::CciEnd, remainder: FieldType::Remainder }
    }

    #[must_use]
    pub fn leading_len(&self) -> usize {
        self.leading.iter().filter_map(|f| f.fixed_length()).sum()
    }

    #[must_use]
    pub fn trailing_len(&self) -> usize {
        self.trailing.iter().filter_map(|f| f.fixed_length()).sum()
    }

    /// Offset of the `SIGNATURE` positional within the blob, for cube types that have
    /// one. Everything before this offset is the signed region (`SPEC_FULL.md` §4.2).
    #[must_use]
    pub fn signature_offset(&self, blob_len: usize) -> Option<usize> {
        self.trailing_field_offset(FieldType::Signature, blob_len)
    }

    /// Byte range `[start, end)` that keying/hashing should exclude for PIC cube types:
    /// the trailing `DATE` + `NONCE` suffix.
    #[must_use]
    pub fn date_nonce_suffix_len(&self) -> usize {
        self.trailing
            .iter()
            .rev()
            .take(2)
            .filter_map(|f| f.fixed_length())
            .sum()
    }

    /// Byte offset of `field_type` within the trailing positional suffix, if this
    /// definition carries one.
    #[must_use]
    pub fn trailing_field_offset(&self, field_type: FieldType, blob_len: usize) -> Option<usize> {
        let mut offset = blob_len - self.trailing_len();
        for ty in &self.trailing {
            if *ty == field_type {
                return Some(offset);
            }
            offset += ty.fixed_length().unwrap_or(0);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CubeType::Frozen, 1, 9)]
    #[test_case(CubeType::FrozenNotify, 33, 9)]
    #[test_case(CubeType::Pic, 1, 9)]
    #[test_case(CubeType::Muc, 1, 105)]
    #[test_case(CubeType::Pmuc, 1, 109)]
    fn lengths_match_layout_table(cube_type: CubeType, leading: usize, trailing: usize) {
        let def = FieldDefinition::for_cube_type(cube_type);
        assert_eq!(def.leading_len(), leading);
        assert_eq!(def.trailing_len(), trailing);
    }

    #[test]
    fn date_nonce_suffix_is_nine_bytes() {
        let def = FieldDefinition::for_cube_type(CubeType::Pic);
        assert_eq!(def.date_nonce_suffix_len(), 9);
    }

    #[test]
    fn signature_offset_present_only_for_signed_types() {
        let muc = FieldDefinition::for_cube_type(CubeType::Muc);
        assert!(muc.signature_offset(1024).is_some());
        let frozen = FieldDefinition::for_cube_type(CubeType::Frozen);
        assert!(frozen.signature_offset(1024).is_none());
    }
}
