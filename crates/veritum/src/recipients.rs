use veritum_crypto::{keystream_xor, open as aead_open, sha3_256, SecretKey, AEAD_KEY_SIZE, AEAD_NONCE_SIZE, AEAD_TAG_SIZE};

/// Zero nonce used for key-slot wrapping: safe to reuse because every slot is wrapped
/// under a distinct, per-recipient derived key — key reuse, not nonce reuse, is what
/// XChaCha20 keystream requires you to avoid.
const SLOT_NONCE: [u8; AEAD_NONCE_SIZE] = [0u8; AEAD_NONCE_SIZE];

/// One key-slot entry: the recipient's wrapped copy of the content key, and nothing
/// else. `SPEC_FULL.md` §4.5's decrypt pipeline identifies a recipient's slot by trial
/// decryption, never by an embedded identifier, so a slot carries no recipient pubkey.
pub const SLOT_LEN: usize = AEAD_KEY_SIZE;

/// Derives a per-recipient key-wrapping key from a raw X25519 shared secret.
#[must_use]
pub fn derive_wrap_key(shared_secret: &[u8; AEAD_KEY_SIZE]) -> [u8; AEAD_KEY_SIZE] {
    sha3_256(shared_secret)
}

#[must_use]
fn wrap_or_unwrap(wrap_key: &[u8; AEAD_KEY_SIZE], key: &[u8; AEAD_KEY_SIZE]) -> [u8; AEAD_KEY_SIZE] {
    let mut out = *key;
    keystream_xor(wrap_key, &SLOT_NONCE, &mut out);
    out
}

/// Builds the key-slot table: one `wrapped_content_key` entry per recipient, in
/// `recipients` order, each wrapped under that recipient's ECDH-derived key.
#[must_use]
pub fn encode_slots(recipients: &[[u8; 32]], content_key: &[u8; AEAD_KEY_SIZE], sender_secret: &SecretKey) -> Vec<u8> {
    let mut out = Vec::with_capacity(recipients.len() * SLOT_LEN);
    for recipient in recipients {
        let shared = sender_secret.diffie_hellman(recipient);
        let wrap_key = derive_wrap_key(&shared);
        out.extend_from_slice(&wrap_or_unwrap(&wrap_key, content_key));
    }
    out
}

/// Scans `rest` — consecutive [`SLOT_LEN`]-byte slots followed by an AEAD-sealed
/// trailing blob — for the one slot that unwraps, under `wrap_key`, to a key whose
/// AEAD-open of the trailing blob authenticates. This is `SPEC_FULL.md` §4.5's decrypt
/// pipeline step 2 ("iterate slots until one … succeeds"): a slot is never addressed by
/// an in-band recipient identifier, only ever by trial.
#[must_use]
pub fn trial_decrypt_slots(
    rest: &[u8],
    wrap_key: &[u8; AEAD_KEY_SIZE],
    nonce: &[u8; AEAD_NONCE_SIZE],
) -> Option<([u8; AEAD_KEY_SIZE], Vec<u8>)> {
    let mut offset = 0;
    while offset + SLOT_LEN + AEAD_TAG_SIZE <= rest.len() {
        let wrapped: [u8; AEAD_KEY_SIZE] =
            rest[offset..offset + SLOT_LEN].try_into().expect("loop bound guarantees slot length");
        let candidate = wrap_or_unwrap(wrap_key, &wrapped);
        if let Ok(plaintext) = aead_open(&candidate, nonce, &rest[offset + SLOT_LEN..]) {
            return Some((candidate, plaintext));
        }
        offset += SLOT_LEN;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_recipient_recovers_the_same_content_key_by_trial() {
        let sender = SecretKey::generate();
        let alice = SecretKey::generate();
        let bob = SecretKey::generate();
        let recipients = [alice.public_key(), bob.public_key()];
        let content_key = [42u8; AEAD_KEY_SIZE];

        let slots = encode_slots(&recipients, &content_key, &sender);
        let nonce = [7u8; AEAD_NONCE_SIZE];
        let mut rest = slots.clone();
        rest.extend_from_slice(&veritum_crypto::seal(&content_key, &nonce, b"payload"));

        let sender_pub = sender.public_key();
        let alice_wrap_key = derive_wrap_key(&alice.diffie_hellman(&sender_pub));
        let bob_wrap_key = derive_wrap_key(&bob.diffie_hellman(&sender_pub));

        assert_eq!(trial_decrypt_slots(&rest, &alice_wrap_key, &nonce).map(|(k, p)| (k, p)), Some((content_key, b"payload".to_vec())));
        assert_eq!(trial_decrypt_slots(&rest, &bob_wrap_key, &nonce).map(|(k, _)| k), Some(content_key));
    }

    #[test]
    fn unrelated_secret_finds_no_slot() {
        let sender = SecretKey::generate();
        let alice = SecretKey::generate();
        let mallory = SecretKey::generate();
        let content_key = [7u8; AEAD_KEY_SIZE];
        let nonce = [1u8; AEAD_NONCE_SIZE];

        let mut rest = encode_slots(&[alice.public_key()], &content_key, &sender);
        rest.extend_from_slice(&veritum_crypto::seal(&content_key, &nonce, b"payload"));

        let mallory_wrap_key = derive_wrap_key(&mallory.diffie_hellman(&sender.public_key()));
        assert_eq!(trial_decrypt_slots(&rest, &mallory_wrap_key, &nonce), None);
    }

    #[test]
    fn slots_carry_no_recognizable_recipient_identity() {
        let sender = SecretKey::generate();
        let alice = SecretKey::generate();
        let content_key = [9u8; AEAD_KEY_SIZE];
        let slots = encode_slots(&[alice.public_key()], &content_key, &sender);
        assert_eq!(slots.len(), SLOT_LEN);
        assert_ne!(slots, alice.public_key());
    }
}
