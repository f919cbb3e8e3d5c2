use thiserror::Error;

/// Errors raised by the cryptographic primitives this crate wraps.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("expected a {expected}-byte key, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("expected a {expected}-byte nonce, got {actual}")]
    InvalidNonceLength { expected: usize, actual: usize },

    #[error("signature did not verify")]
    SignatureInvalid,

    #[error("AEAD authentication failed while opening ciphertext")]
    AeadOpenFailed,

    #[error("proof-of-work search was cancelled before a solution was found")]
    PowCancelled,
}
