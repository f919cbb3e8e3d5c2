//! The hybrid positional + TLV field codec: encode/decode one field list into exactly
//! one 1024-byte Cube blob.
//!
//! Grounded on the explicit byte-offset bookkeeping and bounds-checked slice conversions
//! in `kimberlite-storage`'s `record.rs`, and the trait/registry/table-test shape of its
//! `codec.rs` — adapted here from a compression-codec registry into a single positional +
//! TLV field grammar, since this layer has exactly one wire format rather than several.

mod codec;
mod definition;
mod error;
mod field;
mod header;

pub use codec::{compile, decompile, merge_adjacent};
pub use definition::FieldDefinition;
pub use error::CodecError;
pub use field::Field;
pub use header::{decode_header, encode_header, header_len};
