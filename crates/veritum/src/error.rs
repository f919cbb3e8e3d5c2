use thiserror::Error;
use veritum_continuation::ContinuationError;
use veritum_crypto::CryptoError;
use veritum_cube::CubeError;

/// Errors raised while compiling or opening a Veritum.
#[derive(Debug, Error)]
pub enum VeritumError {
    #[error("no encryption material: provide at least one recipient or a pre-shared key")]
    NoEncryptionMaterial,

    #[error("root cube carries no recognizable chunk-crypto framing")]
    UnrecognizedFraming,

    #[error("message references a key-distribution chain but none (or an unreadable one) was supplied")]
    MissingKeyDistribution,

    #[error("chunk list is empty; at least one Cube is required")]
    EmptyChunkList,

    #[error(transparent)]
    Cube(#[from] CubeError),

    #[error(transparent)]
    Continuation(#[from] ContinuationError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}
