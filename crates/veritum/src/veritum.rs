use std::collections::HashMap;

use veritum_codec::{header_len, Field};
use veritum_continuation::DEFAULT_CHUNK_CAPACITY;
use veritum_crypto::{
    next_nonce, open as aead_open, random_nonce, seal as aead_seal, PowPolicy, SecretKey, AEAD_NONCE_SIZE,
    AEAD_TAG_SIZE, AGREEMENT_KEY_SIZE,
};
use veritum_cube::{Cube, UncompiledCube};
use veritum_types::{CubeType, FieldType, RelationshipType};

use crate::error::VeritumError;
use crate::options::{RecipientCredential, VeritumOptions};
use crate::recipients::{derive_wrap_key, encode_slots, trial_decrypt_slots, SLOT_LEN};
use crate::variant::{EncryptionVariant, KEY_DISTRIBUTION_RELATIONSHIP};

/// A compiled, end-to-end encrypted message: a content chain (root Cube plus any
/// continuation Cubes carrying the tail of the plaintext) and, for multi-recipient
/// messages whose key-slot table doesn't fit inline, a set of key-distribution Cubes
/// plus the map needed to hand each recipient only the one they need
/// (`SPEC_FULL.md` §4.5, §4.6).
pub struct Veritum {
    content: Vec<Cube>,
    key_distribution: Vec<Cube>,
    recipient_key_chunk: HashMap<[u8; 32], usize>,
}

impl Veritum {
    #[must_use]
    pub fn content_cubes(&self) -> &[Cube] {
        &self.content
    }

    #[must_use]
    pub fn key_distribution_cubes(&self) -> &[Cube] {
        &self.key_distribution
    }

    /// Every Cube this Veritum produced, in an order a store can persist directly.
    #[must_use]
    pub fn all_cubes(&self) -> Vec<Cube> {
        let mut all = self.key_distribution.clone();
        all.extend(self.content.iter().cloned());
        all
    }

    /// The exact set of Cubes a given recipient needs to recover the plaintext: every
    /// content chunk, plus — only when the key-slot table spilled into its own chain —
    /// the one key-distribution chunk holding that recipient's slot. Mirrors §4.5's
    /// `getRecipientChunks`: a recipient never needs the chunks belonging to others.
    #[must_use]
    pub fn chunks_for_recipient(&self, recipient_public_key: &[u8; 32]) -> (Vec<Cube>, Vec<Cube>) {
        let key_chunks = match self.recipient_key_chunk.get(recipient_public_key) {
            Some(&index) => vec![self.key_distribution[index].clone()],
            None => Vec::new(),
        };
        (self.content.clone(), key_chunks)
    }

    /// Encrypts `plaintext` end-to-end for `options.recipients`/`options.pre_shared_key`,
    /// chunking it across as many Cubes as `options.chunk_payload_capacity` requires.
    ///
    /// If both a pre-shared key and recipients are supplied, the pre-shared key wins —
    /// the cheaper framing is preferred whenever it is unambiguously available.
    pub fn compile(plaintext: &[u8], cube_type: CubeType, pow: PowPolicy, options: VeritumOptions) -> Result<Self, VeritumError> {
        if options.recipients.is_empty() && options.pre_shared_key.is_none() {
            return Err(VeritumError::NoEncryptionMaterial);
        }

        let variant = if options.pre_shared_key.is_some() {
            EncryptionVariant::PreShared
        } else if options.recipients.len() == 1 {
            EncryptionVariant::SingleRecipient
        } else {
            EncryptionVariant::MultiRecipient
        };

        let sender_secret = options.sender_secret.unwrap_or_else(SecretKey::generate);
        let chunk_capacity = options.chunk_payload_capacity.max(1);
        let slices: Vec<&[u8]> =
            if plaintext.is_empty() { vec![&[][..]] } else { plaintext.chunks(chunk_capacity).collect() };

        let mut key_distribution: Vec<Cube> = Vec::new();
        let mut recipient_key_chunk: HashMap<[u8; 32], usize> = HashMap::new();
        let content_key: [u8; 32];
        // Bytes preceding `nonce0` in the root chunk's `ENCRYPTED` value: the sender's
        // ephemeral public key, for every variant except pre-shared and externalized
        // multi-recipient (neither needs fresh key agreement at the root itself).
        let mut root_prefix: Vec<u8> = Vec::new();
        // Bytes following `nonce0` and preceding the sealed first plaintext slice: the
        // inline key-slot table, present only when it fits in the root chunk itself.
        let mut inline_slots: Vec<u8> = Vec::new();

        match variant {
            EncryptionVariant::PreShared => {
                content_key = options.pre_shared_key.expect("checked above");
            }
            EncryptionVariant::SingleRecipient => {
                let shared = sender_secret.diffie_hellman(&options.recipients[0]);
                content_key = derive_wrap_key(&shared);
                root_prefix = sender_secret.public_key().to_vec();
            }
            EncryptionVariant::MultiRecipient => {
                let mut random_key = [0u8; 32];
                getrandom::getrandom(&mut random_key).expect("the OS random source is unavailable");
                content_key = random_key;

                let slots = encode_slots(&options.recipients, &content_key, &sender_secret);
                let encrypted_budget = DEFAULT_CHUNK_CAPACITY.saturating_sub(header_len(FieldType::Encrypted));
                let inline_fixed_overhead = AGREEMENT_KEY_SIZE + AEAD_NONCE_SIZE + AEAD_TAG_SIZE + slices[0].len();

                if slots.len() <= encrypted_budget.saturating_sub(inline_fixed_overhead) {
                    // Scenario: the whole slot table fits alongside the sealed payload in
                    // one chunk (`SPEC_FULL.md` §8 scenario 5) — keep it inline.
                    root_prefix = sender_secret.public_key().to_vec();
                    inline_slots = slots;
                } else {
                    // Scenario: the slot table alone is too large (§8 scenario 6) — spill
                    // it across its own chunks, each self-contained with a fresh
                    // ephemeral key and nonce, and record which chunk holds which
                    // recipient so the sender can hand each of them only their own.
                    let slots_per_chunk =
                        (encrypted_budget.saturating_sub(AGREEMENT_KEY_SIZE + AEAD_NONCE_SIZE + AEAD_TAG_SIZE) / SLOT_LEN)
                            .max(1);
                    for recipient_group in options.recipients.chunks(slots_per_chunk) {
                        let chunk_secret = SecretKey::generate();
                        let chunk_nonce = random_nonce();
                        let chunk_slots = encode_slots(recipient_group, &content_key, &chunk_secret);
                        let tag_only = aead_seal(&content_key, &chunk_nonce, &[]);

                        let mut value = chunk_secret.public_key().to_vec();
                        value.extend_from_slice(&chunk_nonce);
                        value.extend_from_slice(&chunk_slots);
                        value.extend_from_slice(&tag_only);

                        let cube =
                            UncompiledCube::new(CubeType::Frozen, vec![Field::new(FieldType::Encrypted, value)]).compile(pow)?;
                        for recipient in recipient_group {
                            recipient_key_chunk.insert(*recipient, key_distribution.len());
                        }
                        key_distribution.push(cube);
                    }
                    // Key material is now fully distributed via `key_distribution`; the
                    // root chunk needs no ephemeral key of its own (pre-shared shape).
                }
            }
            EncryptionVariant::Continuation => unreachable!("only assigned to chunk index > 0, never chosen here"),
        }

        let nonce0 = random_nonce();
        let mut nonce = nonce0;
        let mut tail_cubes = Vec::with_capacity(slices.len().saturating_sub(1));
        for slice in &slices[1..] {
            nonce = next_nonce(&nonce);
            let ciphertext = aead_seal(&content_key, &nonce, slice);
            let cube = UncompiledCube::new(CubeType::Frozen, vec![Field::new(FieldType::Encrypted, ciphertext)]).compile(pow)?;
            tail_cubes.push(cube);
        }

        let mut head_fields = Vec::new();
        for cube in &tail_cubes {
            let mut relates_to = vec![RelationshipType::ContinuedIn.as_byte()];
            relates_to.extend_from_slice(cube.key().as_bytes());
            head_fields.push(Field::new(FieldType::RelatesTo, relates_to));
        }
        for cube in &key_distribution {
            let mut relates_to = vec![RelationshipType::Other(KEY_DISTRIBUTION_RELATIONSHIP).as_byte()];
            relates_to.extend_from_slice(cube.key().as_bytes());
            head_fields.push(Field::new(FieldType::RelatesTo, relates_to));
        }

        let mut root_value = root_prefix;
        root_value.extend_from_slice(&nonce0);
        root_value.extend_from_slice(&inline_slots);
        root_value.extend_from_slice(&aead_seal(&content_key, &nonce0, slices[0]));
        head_fields.push(Field::new(FieldType::Encrypted, root_value));

        let veritum_continuation::RootParams { notify, date, signing_key, update_count } = options.root;
        let mut builder = UncompiledCube::new(cube_type, head_fields);
        if let Some(notify) = notify {
            builder = builder.with_notify(notify);
        }
        if let Some(date) = date {
            builder = builder.with_date(date);
        }
        if let Some(signing_key) = signing_key {
            builder = builder.with_signing_key(signing_key);
        }
        if let Some(update_count) = update_count {
            builder = builder.with_update_count(update_count);
        }
        let root = builder.compile(pow)?;

        let mut content = Vec::with_capacity(tail_cubes.len() + 1);
        content.push(root);
        content.extend(tail_cubes);

        tracing::debug!(
            variant = ?variant,
            chunks = content.len(),
            key_distribution_chunks = key_distribution.len(),
            "veritum compiled"
        );
        Ok(Self { content, key_distribution, recipient_key_chunk })
    }

    /// Decrypts a content chain (`content[0]` the root, `content[1..]` its continuation
    /// chunks in `CONTINUED_IN` order) back into plaintext. `key_distribution` supplies
    /// whichever key-distribution chunk(s) this recipient was handed — usually exactly
    /// one, per [`Self::chunks_for_recipient`] — and is empty when the key material was
    /// distributed inline or via a pre-shared key.
    ///
    /// Per `SPEC_FULL.md` §7's propagation policy, authentication failure (wrong
    /// credential, wrong key-distribution chunk, corrupted ciphertext) is not an error:
    /// it is untrusted-network noise, silently absorbed into an empty payload. Only
    /// structural framing problems (missing fields, mismatched reference counts) surface
    /// as a typed `Err`.
    pub fn open(content: &[Cube], key_distribution: &[Cube], credential: &RecipientCredential) -> Result<Vec<u8>, VeritumError> {
        let root = content.first().ok_or(VeritumError::EmptyChunkList)?;
        let root_fields = root.fields()?;
        let root_value = field_value(&root_fields, FieldType::Encrypted).ok_or(VeritumError::UnrecognizedFraming)?;

        if !key_distribution.is_empty() {
            let declared = relates_to_keys(&root_fields, KEY_DISTRIBUTION_RELATIONSHIP);
            for cube in key_distribution {
                if !declared.iter().any(|key| *key == *cube.key().as_bytes()) {
                    return Err(VeritumError::MissingKeyDistribution);
                }
            }
        }

        let continuation_keys = relates_to_keys(&root_fields, RelationshipType::ContinuedIn.as_byte());
        if continuation_keys.len() != content.len() - 1 {
            return Err(VeritumError::UnrecognizedFraming);
        }
        for (expected, cube) in continuation_keys.iter().zip(content.iter().skip(1)) {
            if *expected != *cube.key().as_bytes() {
                return Err(VeritumError::UnrecognizedFraming);
            }
        }

        let opened = match credential {
            RecipientCredential::PreShared(key) => open_pre_shared(root_value, key),
            RecipientCredential::Secret(secret) => {
                if key_distribution.is_empty() {
                    open_single_recipient(root_value, secret).or_else(|| open_multi_recipient_inline(root_value, secret))
                } else {
                    recover_via_key_distribution(key_distribution, secret).and_then(|key| open_pre_shared(root_value, &key))
                }
            }
        };
        let (content_key, nonce0, mut plaintext) = match opened {
            Some(opened) => opened,
            None => return Ok(Vec::new()),
        };

        let mut nonce = nonce0;
        for cube in &content[1..] {
            nonce = next_nonce(&nonce);
            let fields = cube.fields()?;
            let ciphertext = field_value(&fields, FieldType::Encrypted).ok_or(VeritumError::UnrecognizedFraming)?;
            match aead_open(&content_key, &nonce, ciphertext) {
                Ok(chunk_plaintext) => plaintext.extend_from_slice(&chunk_plaintext),
                Err(_) => return Ok(Vec::new()),
            }
        }
        Ok(plaintext)
    }
}

fn field_value(fields: &[Field], ty: FieldType) -> Option<&[u8]> {
    fields.iter().find(|f| f.field_type == ty).map(|f| f.value.as_slice())
}

fn relates_to_keys(fields: &[Field], relationship_byte: u8) -> Vec<[u8; 32]> {
    fields
        .iter()
        .filter(|f| f.field_type == FieldType::RelatesTo && f.value.first().copied() == Some(relationship_byte))
        .filter_map(|f| f.value.get(1..).and_then(|bytes| bytes.try_into().ok()))
        .collect()
}

type Opened = ([u8; 32], [u8; AEAD_NONCE_SIZE], Vec<u8>);

/// Pre-shared-key framing: `nonce(24) ‖ ciphertext‖tag`. Also used to finish decrypting
/// the root chunk once a multi-chunk key-distribution lookup has already recovered the
/// content key — at that point the root carries no ephemeral key of its own either.
fn open_pre_shared(value: &[u8], key: &[u8; 32]) -> Option<Opened> {
    if value.len() < AEAD_NONCE_SIZE {
        return None;
    }
    let nonce: [u8; AEAD_NONCE_SIZE] = value[..AEAD_NONCE_SIZE].try_into().ok()?;
    let plaintext = aead_open(key, &nonce, &value[AEAD_NONCE_SIZE..]).ok()?;
    Some((*key, nonce, plaintext))
}

/// Single-recipient framing: `sender_eph_pk(32) ‖ nonce(24) ‖ ciphertext‖tag`.
fn open_single_recipient(value: &[u8], secret: &SecretKey) -> Option<Opened> {
    if value.len() < AGREEMENT_KEY_SIZE + AEAD_NONCE_SIZE {
        return None;
    }
    let eph_pk: [u8; 32] = value[..AGREEMENT_KEY_SIZE].try_into().ok()?;
    let nonce: [u8; AEAD_NONCE_SIZE] = value[AGREEMENT_KEY_SIZE..AGREEMENT_KEY_SIZE + AEAD_NONCE_SIZE].try_into().ok()?;
    let content_key = derive_wrap_key(&secret.diffie_hellman(&eph_pk));
    let plaintext = aead_open(&content_key, &nonce, &value[AGREEMENT_KEY_SIZE + AEAD_NONCE_SIZE..]).ok()?;
    Some((content_key, nonce, plaintext))
}

/// Inline multi-recipient framing:
/// `sender_eph_pk(32) ‖ nonce(24) ‖ slot_0(32) … slot_{m-1}(32) ‖ ciphertext‖tag`.
fn open_multi_recipient_inline(value: &[u8], secret: &SecretKey) -> Option<Opened> {
    if value.len() < AGREEMENT_KEY_SIZE + AEAD_NONCE_SIZE {
        return None;
    }
    let eph_pk: [u8; 32] = value[..AGREEMENT_KEY_SIZE].try_into().ok()?;
    let nonce: [u8; AEAD_NONCE_SIZE] = value[AGREEMENT_KEY_SIZE..AGREEMENT_KEY_SIZE + AEAD_NONCE_SIZE].try_into().ok()?;
    let wrap_key = derive_wrap_key(&secret.diffie_hellman(&eph_pk));
    let rest = &value[AGREEMENT_KEY_SIZE + AEAD_NONCE_SIZE..];
    let (content_key, plaintext) = trial_decrypt_slots(rest, &wrap_key, &nonce)?;
    Some((content_key, nonce, plaintext))
}

/// Recovers the content key from one externalized key-distribution chunk: each uses the
/// same inline-multi-recipient layout, but over an empty payload (`ciphertext‖tag` is
/// just the 16-byte tag), so a successful trial decrypt authenticates the content key
/// directly rather than any real plaintext.
fn recover_via_key_distribution(key_distribution: &[Cube], secret: &SecretKey) -> Option<[u8; 32]> {
    for cube in key_distribution {
        let Ok(fields) = cube.fields() else { continue };
        let Some(value) = field_value(&fields, FieldType::Encrypted) else { continue };
        if let Some((content_key, _, _)) = open_multi_recipient_inline(value, secret) {
            return Some(content_key);
        }
    }
    None
}
