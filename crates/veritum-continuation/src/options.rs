use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use veritum_types::FieldType;

/// Plain field-level content a chunk's own capacity must absorb alongside split data:
/// 1024 bytes minus whatever the default `FROZEN` positional overhead reserves. Encrypted
/// Veritums override this via [`ContinuationOptions::max_chunk_size`] to also reserve
/// room for AEAD framing (`SPEC_FULL.md` §4.5's space-accounting callback).
pub const DEFAULT_CHUNK_CAPACITY: usize = 1014;

/// Minimum number of raw value bytes worth fragmenting a variable-length field for,
/// below which the splitter rolls the whole field over to the next chunk instead
/// (`SPEC_FULL.md` §4.4).
pub const MIN_CHUNK: usize = 10;

/// Tunables for [`crate::split`]/[`crate::recombine`].
///
/// `map_field_to_chunk`'s `-1` sentinel means "copy to every chunk" on split and
/// "restore from chunk 0 only" on recombine — deliberately asymmetric, see
/// `SPEC_FULL.md` §9. This port applies the mapping only to payload-level (TLV) field
/// types; `DATE`, `NOTIFY`, and `PMUC_UPDATE_COUNT` are positional and are instead
/// supplied per chunk directly to the Cube builder by the facade crate (`veritum`),
/// which is the type-safe equivalent of mapping them through this generic mechanism.
#[derive(Clone)]
pub struct ContinuationOptions {
    pub max_chunk_size: Arc<dyn Fn(usize) -> usize + Send + Sync>,
    pub exclude: HashSet<FieldType>,
    pub map_field_to_chunk: HashMap<FieldType, i32>,
}

impl ContinuationOptions {
    #[must_use]
    pub fn capacity_for(&self, chunk_index: usize) -> usize {
        (self.max_chunk_size)(chunk_index)
    }
}

impl Default for ContinuationOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: Arc::new(|_chunk_index| DEFAULT_CHUNK_CAPACITY),
            exclude: HashSet::from([FieldType::CciEnd, FieldType::Padding, FieldType::Remainder]),
            map_field_to_chunk: HashMap::new(),
        }
    }
}

impl std::fmt::Debug for ContinuationOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContinuationOptions")
            .field("exclude", &self.exclude)
            .field("map_field_to_chunk", &self.map_field_to_chunk)
            .finish_non_exhaustive()
    }
}
