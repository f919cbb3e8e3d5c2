use veritum_codec::{compile, decompile, Field, FieldDefinition};
use veritum_crypto::{solve_pow, PowPolicy, SigningKeyPair};
use veritum_types::{CubeType, FieldType, Key, Timestamp, CUBE_SIZE};

use crate::key_derivation::derive_key;
use crate::CubeError;

/// A Cube before it has been assigned a date, nonce, or (for signed types) a signature —
/// the builder stage of the lifecycle described in `SPEC_FULL.md` §3.
pub struct UncompiledCube {
    cube_type: CubeType,
    payload: Vec<Field>,
    notify: Option<Key>,
    date: Option<Timestamp>,
    signing_key: Option<SigningKeyPair>,
    update_count: Option<u32>,
}

impl UncompiledCube {
    #[must_use]
    pub fn new(cube_type: CubeType, payload: Vec<Field>) -> Self {
        Self { cube_type, payload, notify: None, date: None, signing_key: None, update_count: None }
    }

    #[must_use]
    pub fn with_notify(mut self, notify: Key) -> Self {
        self.notify = Some(notify);
        self
    }

    #[must_use]
    pub fn with_date(mut self, date: Timestamp) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub fn with_signing_key(mut self, signing_key: SigningKeyPair) -> Self {
        self.signing_key = Some(signing_key);
        self
    }

    #[must_use]
    pub fn with_update_count(mut self, update_count: u32) -> Self {
        self.update_count = Some(update_count);
        self
    }

    /// Fills in defaults, signs (for MUC/PMUC), solves proof-of-work, and freezes the
    /// result into an immutable [`Cube`]. Mirrors `Cube.compile()` from `SPEC_FULL.md`
    /// §4.2: once this returns, the only way to get a different Cube is to build a new
    /// `UncompiledCube` — there is no in-place field mutation after this point (design
    /// note §9, resolved issue (a)).
    pub fn compile(self, pow: PowPolicy) -> Result<Cube, CubeError> {
        let def = FieldDefinition::for_cube_type(self.cube_type);
        let date = self.date.unwrap_or_else(Timestamp::now);

        let mut leading = vec![Field::new(FieldType::Type, vec![self.cube_type.as_byte()])];
        if self.cube_type.has_notify() {
            let notify = self.notify.unwrap_or(Key::ZERO);
            leading.push(Field::new(FieldType::Notify, notify.as_bytes().to_vec()));
        }

        let mut trailing = Vec::new();
        let public_key_bytes = if self.cube_type.is_signed() {
            let signing_key = self.signing_key.as_ref().ok_or(CubeError::MissingSigningKey(self.cube_type))?;
            let public_key = signing_key.public_key();
            trailing.push(Field::new(FieldType::PublicKey, public_key.to_vec()));
            Some(public_key)
        } else {
            None
        };
        trailing.push(Field::new(FieldType::Date, date.to_wire_bytes().to_vec()));
        if self.cube_type.is_presence() {
            let count = self.update_count.unwrap_or(0);
            trailing.push(Field::new(FieldType::PmucUpdateCount, count.to_be_bytes().to_vec()));
        }
        if self.cube_type.is_signed() {
            // Placeholder; overwritten below once the signed prefix is known.
            trailing.push(Field::new(FieldType::Signature, vec![0u8; veritum_crypto::SIGNATURE_SIZE]));
        }
        trailing.push(Field::new(FieldType::Nonce, vec![0u8; 4]));

        let mut fields = leading;
        fields.extend(self.payload);
        fields.extend(trailing);

        let mut blob = compile(&fields, &def, CUBE_SIZE)?;

        if self.cube_type.is_signed() {
            let signing_key = self.signing_key.as_ref().ok_or(CubeError::MissingSigningKey(self.cube_type))?;
            let sig_offset = def
                .signature_offset(CUBE_SIZE)
                .ok_or(CubeError::TypeError(self.cube_type))?;
            let signature = signing_key.sign(&blob[..sig_offset]);
            blob[sig_offset..sig_offset + veritum_crypto::SIGNATURE_SIZE].copy_from_slice(&signature);
            debug_assert_eq!(public_key_bytes, Some(signing_key.public_key()));
        }

        let nonce_offset = CUBE_SIZE - veritum_types::FieldType::Nonce.fixed_length().unwrap();
        solve_pow(&mut blob, nonce_offset..CUBE_SIZE, pow, None)?;

        let key = derive_key(self.cube_type, &blob, &def);
        let blob: [u8; CUBE_SIZE] = blob.try_into().expect("compile() always emits CUBE_SIZE bytes");
        tracing::debug!(cube_type = ?self.cube_type, %key, "cube compiled");
        Ok(Cube { cube_type: self.cube_type, blob, key })
    }
}

/// An immutable, compiled Cube: exactly [`CUBE_SIZE`] bytes, with a known content key.
///
/// There is deliberately no API to mutate a field and keep the same `Cube` value — any
/// respecification goes through [`UncompiledCube`] and produces a new one, which is how
/// this port avoids the "mutation invalidates the cached key" hazard called out in
/// `SPEC_FULL.md` §9.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cube {
    cube_type: CubeType,
    blob: [u8; CUBE_SIZE],
    key: Key,
}

impl Cube {
    /// Parses and validates a compiled blob: checks its length, decodes its structure,
    /// verifies its signature (for signed types), and derives its key. Does **not**
    /// check proof-of-work — callers that need policy enforcement call
    /// [`Cube::verify_proof_of_work`] explicitly (the store does, on `add`).
    pub fn from_blob(cube_type: CubeType, blob: &[u8]) -> Result<Self, CubeError> {
        if blob.len() != CUBE_SIZE {
            return Err(CubeError::BinaryLengthError { expected: CUBE_SIZE, actual: blob.len() });
        }
        let def = FieldDefinition::for_cube_type(cube_type);
        // Decoding validates the TLV structure even though we discard the field list here;
        // callers that need the fields call `Cube::fields`.
        decompile(blob, &def)?;

        let blob: [u8; CUBE_SIZE] = blob.try_into().expect("length checked above");
        let key = derive_key(cube_type, &blob, &def);
        let cube = Self { cube_type, blob, key };
        if cube_type.is_signed() {
            cube.verify_signature()?;
        }
        Ok(cube)
    }

    #[must_use]
    pub fn cube_type(&self) -> CubeType {
        self.cube_type
    }

    #[must_use]
    pub fn blob(&self) -> &[u8; CUBE_SIZE] {
        &self.blob
    }

    #[must_use]
    pub fn key(&self) -> Key {
        self.key
    }

    #[must_use]
    pub fn hash(&self) -> [u8; 32] {
        veritum_crypto::sha3_256(&self.blob)
    }

    /// Decodes the full field list (positionals included) from the blob.
    pub fn fields(&self) -> Result<Vec<Field>, CubeError> {
        let def = FieldDefinition::for_cube_type(self.cube_type);
        Ok(decompile(&self.blob, &def)?)
    }

    /// Verifies the embedded Ed25519 signature against the embedded public key, for
    /// MUC/PMUC types. The signed region is every byte before the `SIGNATURE` field
    /// (`SPEC_FULL.md` §4.2) — this includes `PMUC_UPDATE_COUNT` but never the
    /// signature or nonce themselves.
    pub fn verify_signature(&self) -> Result<(), CubeError> {
        if !self.cube_type.is_signed() {
            return Err(CubeError::TypeError(self.cube_type));
        }
        let def = FieldDefinition::for_cube_type(self.cube_type);
        let sig_offset = def.signature_offset(CUBE_SIZE).ok_or(CubeError::TypeError(self.cube_type))?;
        let signature: [u8; 64] = self.blob[sig_offset..sig_offset + 64]
            .try_into()
            .expect("SIGNATURE field is always 64 bytes");
        let public_key: [u8; 32] = self.key.as_bytes().to_owned();
        veritum_crypto::verify(&public_key, &self.blob[..sig_offset], &signature)?;
        Ok(())
    }

    /// Checks that this Cube's hash satisfies `policy`'s hashcash difficulty.
    #[must_use]
    pub fn verify_proof_of_work(&self, policy: PowPolicy) -> bool {
        policy.is_satisfied_by(&self.hash())
    }

    /// `DATE` positional, present on every Cube type.
    pub fn date(&self) -> Result<Timestamp, CubeError> {
        let def = FieldDefinition::for_cube_type(self.cube_type);
        let offset = def
            .trailing_field_offset(FieldType::Date, CUBE_SIZE)
            .ok_or(CubeError::TypeError(self.cube_type))?;
        let bytes: [u8; 5] = self.blob[offset..offset + 5].try_into().expect("DATE is 5 bytes");
        Ok(Timestamp::from_wire_bytes(bytes))
    }

    /// `PMUC_UPDATE_COUNT` positional, present only on PMUC/PMUC_NOTIFY.
    pub fn update_count(&self) -> Result<u32, CubeError> {
        if !self.cube_type.is_presence() {
            return Err(CubeError::TypeError(self.cube_type));
        }
        let def = FieldDefinition::for_cube_type(self.cube_type);
        let offset = def
            .trailing_field_offset(FieldType::PmucUpdateCount, CUBE_SIZE)
            .ok_or(CubeError::TypeError(self.cube_type))?;
        let bytes: [u8; 4] = self.blob[offset..offset + 4].try_into().expect("UPDATE_COUNT is 4 bytes");
        Ok(u32::from_be_bytes(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_field(bytes: &[u8]) -> Field {
        Field::new(FieldType::Payload, bytes.to_vec())
    }

    #[test]
    fn frozen_roundtrip() {
        let uncompiled = UncompiledCube::new(CubeType::Frozen, vec![payload_field(b"hello")]);
        let cube = uncompiled.compile(PowPolicy::new(0)).unwrap();
        assert_eq!(cube.blob().len(), CUBE_SIZE);
        assert_eq!(cube.key(), Key::from_bytes(veritum_crypto::sha3_256(cube.blob())));

        let reparsed = Cube::from_blob(CubeType::Frozen, cube.blob()).unwrap();
        assert_eq!(reparsed.key(), cube.key());
        let fields = reparsed.fields().unwrap();
        assert!(fields.iter().any(|f| f.field_type == FieldType::Payload && f.value == b"hello"));
    }

    #[test]
    fn muc_signature_verifies() {
        let signing_key = SigningKeyPair::generate();
        let uncompiled = UncompiledCube::new(CubeType::Muc, vec![payload_field(b"hi")])
            .with_signing_key(signing_key);
        let cube = uncompiled.compile(PowPolicy::new(0)).unwrap();
        cube.verify_signature().unwrap();
    }

    #[test]
    fn muc_tampered_blob_fails_signature_verification() {
        let signing_key = SigningKeyPair::generate();
        let uncompiled = UncompiledCube::new(CubeType::Muc, vec![payload_field(b"hi")])
            .with_signing_key(signing_key);
        let cube = uncompiled.compile(PowPolicy::new(0)).unwrap();
        let mut tampered = *cube.blob();
        tampered[0] ^= 0xFF;
        let reparsed = Cube::from_blob(CubeType::Muc, &tampered);
        assert!(reparsed.is_err());
    }

    #[test]
    fn missing_signing_key_is_rejected_for_muc() {
        let uncompiled = UncompiledCube::new(CubeType::Muc, vec![payload_field(b"hi")]);
        assert!(matches!(uncompiled.compile(PowPolicy::new(0)), Err(CubeError::MissingSigningKey(_))));
    }

    #[test]
    fn proof_of_work_is_checkable_after_compile() {
        let cube = UncompiledCube::new(CubeType::Frozen, vec![payload_field(b"x")])
            .compile(PowPolicy::new(4))
            .unwrap();
        assert!(cube.verify_proof_of_work(PowPolicy::new(4)));
    }
}
