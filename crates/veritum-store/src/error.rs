use thiserror::Error;

/// Store-level failures. Contest loss is *not* one of these — see [`crate::AddOutcome`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("blob is too short to contain a TYPE positional")]
    EmptyBlob,

    #[error("blob's TYPE byte {0} does not name a known cube type")]
    UnknownCubeType(u8),
}
