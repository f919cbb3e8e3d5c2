/// How a Cube's key is derived, and what its positional suffix looks like.
///
/// Mirrors the byte-discriminant enum pattern `kimberlite-types` uses for `RecordKind`
/// (`as_byte`/`from_byte` round-trip instead of relying on `#[repr(u8)]` transmutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeType {
    Frozen,
    FrozenNotify,
    Pic,
    PicNotify,
    Muc,
    MucNotify,
    Pmuc,
    PmucNotify,
}

impl CubeType {
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            CubeType::Frozen => 0,
            CubeType::FrozenNotify => 1,
            CubeType::Pic => 2,
            CubeType::PicNotify => 3,
            CubeType::Muc => 4,
            CubeType::MucNotify => 5,
            CubeType::Pmuc => 6,
            CubeType::PmucNotify => 7,
        }
    }

    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0 => CubeType::Frozen,
            1 => CubeType::FrozenNotify,
            2 => CubeType::Pic,
            3 => CubeType::PicNotify,
            4 => CubeType::Muc,
            5 => CubeType::MucNotify,
            6 => CubeType::Pmuc,
            7 => CubeType::PmucNotify,
            _ => return None,
        })
    }

    /// Whether this type carries a leading 32-byte `NOTIFY` positional.
    #[must_use]
    pub const fn has_notify(self) -> bool {
        matches!(
            self,
            CubeType::FrozenNotify | CubeType::PicNotify | CubeType::MucNotify | CubeType::PmucNotify
        )
    }

    /// Whether this type carries `PUBLIC_KEY`/`SIGNATURE` trailing positionals and is
    /// keyed by its embedded public key rather than a content hash.
    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self, CubeType::Muc | CubeType::MucNotify | CubeType::Pmuc | CubeType::PmucNotify)
    }

    /// Whether this type carries a `PMUC_UPDATE_COUNT` trailing positional.
    #[must_use]
    pub const fn is_presence(self) -> bool {
        matches!(self, CubeType::Pmuc | CubeType::PmucNotify)
    }

    /// Whether the key is derived by excluding the trailing `DATE`+`NONCE` suffix from
    /// the hash input (PIC family only).
    #[must_use]
    pub const fn excludes_date_nonce_from_key(self) -> bool {
        matches!(self, CubeType::Pic | CubeType::PicNotify)
    }

    /// The base type without its `_NOTIFY` variant, used when only the family matters
    /// (contest rules, key derivation mode).
    #[must_use]
    pub const fn base(self) -> Self {
        match self {
            CubeType::Frozen | CubeType::FrozenNotify => CubeType::Frozen,
            CubeType::Pic | CubeType::PicNotify => CubeType::Pic,
            CubeType::Muc | CubeType::MucNotify => CubeType::Muc,
            CubeType::Pmuc | CubeType::PmucNotify => CubeType::Pmuc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CubeType::Frozen)]
    #[test_case(CubeType::FrozenNotify)]
    #[test_case(CubeType::Pic)]
    #[test_case(CubeType::PicNotify)]
    #[test_case(CubeType::Muc)]
    #[test_case(CubeType::MucNotify)]
    #[test_case(CubeType::Pmuc)]
    #[test_case(CubeType::PmucNotify)]
    fn byte_roundtrip(ty: CubeType) {
        assert_eq!(CubeType::from_byte(ty.as_byte()), Some(ty));
    }

    #[test]
    fn unknown_byte_rejected() {
        assert_eq!(CubeType::from_byte(0xff), None);
    }

    #[test]
    fn notify_variants_flagged() {
        assert!(CubeType::PicNotify.has_notify());
        assert!(!CubeType::Pic.has_notify());
    }

    #[test]
    fn only_muc_pmuc_are_signed() {
        assert!(CubeType::Muc.is_signed());
        assert!(CubeType::Pmuc.is_signed());
        assert!(!CubeType::Frozen.is_signed());
        assert!(!CubeType::Pic.is_signed());
    }
}
