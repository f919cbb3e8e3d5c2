use chacha20::cipher::{KeyIvInit, StreamCipher};
use chacha20::XChaCha20;
use chacha20poly1305::aead::{Aead, KeyInit, Payload};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};

use crate::CryptoError;

/// Size in bytes of a chunk-crypto symmetric key.
pub const AEAD_KEY_SIZE: usize = 32;
/// Size in bytes of a chunk-crypto nonce (shared by the AEAD and the raw stream cipher).
pub const AEAD_NONCE_SIZE: usize = 24;
/// Size in bytes of the Poly1305 authentication tag appended to every sealed value.
pub const AEAD_TAG_SIZE: usize = 16;

/// Encrypts `plaintext` under `key`/`nonce`, returning `ciphertext || tag`.
///
/// This is this port's equivalent of libsodium's `crypto_secretbox_easy`: XChaCha20 in
/// place of XSalsa20, Poly1305 in both cases. See `SPEC_FULL.md` §10.2 for the full
/// substitution ledger.
#[must_use]
pub fn seal(key: &[u8; AEAD_KEY_SIZE], nonce: &[u8; AEAD_NONCE_SIZE], plaintext: &[u8]) -> Vec<u8> {
    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .encrypt(XNonce::from_slice(nonce), Payload { msg: plaintext, aad: &[] })
        .expect("XChaCha20-Poly1305 encryption is infallible for in-memory payloads")
}

/// Decrypts a value previously produced by [`seal`]. Returns
/// [`CryptoError::AeadOpenFailed`] on any authentication failure — the caller (the chunk
/// decrypt pipeline) treats this as "not for this key," not as a hard error.
pub fn open(
    key: &[u8; AEAD_KEY_SIZE],
    nonce: &[u8; AEAD_NONCE_SIZE],
    ciphertext_and_tag: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = XChaCha20Poly1305::new(key.into());
    cipher
        .decrypt(XNonce::from_slice(nonce), Payload { msg: ciphertext_and_tag, aad: &[] })
        .map_err(|_| CryptoError::AeadOpenFailed)
}

/// XORs `data` in place with the raw XChaCha20 keystream under `key`/`nonce`.
///
/// Used to wrap individual 32-byte payload-key slots in the multi-recipient framing
/// variant (`SPEC_FULL.md` §4.5) — this port's equivalent of libsodium's
/// `crypto_stream_xchacha20_xor`, with no AEAD tag since each slot is re-authenticated
/// implicitly by the payload AEAD it unlocks.
pub fn keystream_xor(key: &[u8; AEAD_KEY_SIZE], nonce: &[u8; AEAD_NONCE_SIZE], data: &mut [u8]) {
    let mut cipher = XChaCha20::new(key.into(), nonce.into());
    cipher.apply_keystream(data);
}
