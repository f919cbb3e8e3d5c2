//! Cryptographic primitives for Cube hashing/proof-of-work and Veritum chunk encryption.
//!
//! Primitive choices follow the RustCrypto ecosystem this workspace is built on rather
//! than the reference design's libsodium calls; `SPEC_FULL.md` §10.2 records the full
//! substitution ledger (SHA3-256 for hashing, Ed25519 for signing, X25519 for agreement,
//! XChaCha20-Poly1305 for the chunk AEAD, raw XChaCha20 for key-slot wrapping, BLAKE3 in
//! place of BLAKE2b for nonce chaining).

mod agreement;
mod aead;
mod error;
mod hash;
mod nonce_chain;
mod signing;

pub use agreement::{SecretKey, AGREEMENT_KEY_SIZE};
pub use aead::{keystream_xor, open, seal, AEAD_KEY_SIZE, AEAD_NONCE_SIZE, AEAD_TAG_SIZE};
pub use error::CryptoError;
pub use hash::{sha3_256, solve_pow, trailing_zero_bits, PowPolicy, HASH_SIZE};
pub use nonce_chain::{next_nonce, random_nonce};
pub use signing::{verify, SigningKeyPair, PUBLIC_KEY_SIZE, SIGNATURE_SIZE};
