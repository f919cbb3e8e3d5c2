use thiserror::Error;
use veritum_codec::CodecError;
use veritum_cube::CubeError;

/// Errors raised while splitting a field list across Cubes or recombining them.
#[derive(Debug, Error)]
pub enum ContinuationError {
    #[error("nothing to split: the field list was empty after excluding mapped/excluded types")]
    NoFieldsToSplit,

    #[error("a single field ({0:?}) is too large to fit in any chunk, even alone")]
    FieldTooLargeForAnyChunk(veritum_types::FieldType),

    #[error("chunk list is empty; at least one chunk is required to recombine")]
    EmptyChunkList,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Cube(#[from] CubeError),
}
