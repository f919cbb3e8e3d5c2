/// Every field that can appear inside a Cube, positional or TLV.
///
/// TLV codes are 6 bits wide (0..=63) per the header format in `SPEC_FULL.md` §6;
/// positional types never appear in a TLV header and have no numeric code of that kind,
/// so they are kept in the same enum but routed around the TLV codec entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    // --- positional (fixed offset, fixed length, never TLV-framed) ---
    Type,
    Notify,
    PublicKey,
    Date,
    Signature,
    Nonce,
    PmucUpdateCount,

    // --- TLV, fixed length (1-byte type-only header) ---
    PaddingSingleByte,
    RelatesTo,
    CciEnd,

    // --- TLV, variable length (2-byte type+length header) ---
    Application,
    Payload,
    Encrypted,
    CryptoEphemeralKey,
    CryptoNonce,
    CryptoKeySlots,
    Padding,

    /// Virtual: bytes between the last recognized field and the trailing positionals
    /// that didn't parse as any known field. Never written back on re-compile.
    Remainder,
}

impl FieldType {
    /// The 6-bit TLV type code, for field types that are ever TLV-framed.
    #[must_use]
    pub const fn tlv_code(self) -> Option<u8> {
        Some(match self {
            FieldType::PaddingSingleByte => 0,
            FieldType::CciEnd => 1,
            FieldType::RelatesTo => 2,
            FieldType::Application => 4,
            FieldType::CryptoEphemeralKey => 8,
            FieldType::CryptoNonce => 9,
            FieldType::CryptoKeySlots => 10,
            FieldType::Payload => 64,
            FieldType::Encrypted => 65,
            FieldType::Padding => 124,
            FieldType::Type
            | FieldType::Notify
            | FieldType::PublicKey
            | FieldType::Date
            | FieldType::Signature
            | FieldType::Nonce
            | FieldType::PmucUpdateCount
            | FieldType::Remainder => return None,
        })
    }

    #[must_use]
    pub const fn from_tlv_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => FieldType::PaddingSingleByte,
            1 => FieldType::CciEnd,
            2 => FieldType::RelatesTo,
            4 => FieldType::Application,
            8 => FieldType::CryptoEphemeralKey,
            9 => FieldType::CryptoNonce,
            10 => FieldType::CryptoKeySlots,
            64 => FieldType::Payload,
            65 => FieldType::Encrypted,
            124 => FieldType::Padding,
            _ => return None,
        })
    }

    /// `Some(len)` for every field whose encoded length never varies; `None` for
    /// variable-length TLV fields, whose length is carried in the 10-bit length field.
    #[must_use]
    pub const fn fixed_length(self) -> Option<usize> {
        match self {
            FieldType::Type => Some(1),
            FieldType::Notify | FieldType::PublicKey => Some(32),
            FieldType::Date => Some(5),
            FieldType::Signature => Some(64),
            FieldType::Nonce => Some(4),
            FieldType::PmucUpdateCount => Some(4),
            FieldType::PaddingSingleByte => Some(0),
            FieldType::CciEnd => Some(0),
            FieldType::RelatesTo => Some(33),
            FieldType::Application
            | FieldType::Payload
            | FieldType::Encrypted
            | FieldType::CryptoEphemeralKey
            | FieldType::CryptoNonce
            | FieldType::CryptoKeySlots
            | FieldType::Padding
            | FieldType::Remainder => None,
        }
    }

    #[must_use]
    pub const fn is_positional(self) -> bool {
        matches!(
            self,
            FieldType::Type
                | FieldType::Notify
                | FieldType::PublicKey
                | FieldType::Date
                | FieldType::Signature
                | FieldType::Nonce
                | FieldType::PmucUpdateCount
        )
    }

    #[must_use]
    pub const fn is_variable_length(self) -> bool {
        self.fixed_length().is_none() && !matches!(self, FieldType::Remainder)
    }
}
