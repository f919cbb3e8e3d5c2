use thiserror::Error;
use veritum_codec::CodecError;
use veritum_crypto::CryptoError;

/// Errors raised while building, parsing, or validating a [`crate::Cube`].
#[derive(Debug, Error)]
pub enum CubeError {
    #[error("blob is {actual} bytes, expected exactly {expected}")]
    BinaryLengthError { expected: usize, actual: usize },

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    #[error("cube type {0:?} requires a signing key pair to compile")]
    MissingSigningKey(veritum_types::CubeType),

    #[error("cube type {0:?} has no public key field to verify against")]
    TypeError(veritum_types::CubeType),

    #[error("compiled blob does not satisfy the required proof-of-work difficulty")]
    InsufficientProofOfWork,
}
