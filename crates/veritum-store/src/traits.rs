use veritum_cube::CubeError;
use veritum_types::Key;

use crate::StoreError;

/// Outcome of [`CubeStore::add`]. Only truly exceptional conditions (an unparseable
/// `TYPE` byte) become an `Err(StoreError)`; an invalid or contest-losing Cube is a
/// normal, successful `add` call that simply didn't change the store (`SPEC_FULL.md` §7).
#[derive(Debug)]
pub enum AddOutcome {
    Accepted,
    RejectedForContest,
    RejectedForInvalid(CubeError),
}

/// The blocking store-lookup interface the core consumes; `InMemoryCubeStore` is this
/// workspace's one reference implementation (`SPEC_FULL.md` §10.3).
pub trait CubeStore: Send + Sync {
    fn add(&self, blob: Vec<u8>) -> Result<AddOutcome, StoreError>;
    fn get(&self, key: &Key) -> Option<Vec<u8>>;
    fn get_all(&self) -> Vec<Vec<u8>>;
}

/// Registered against a [`CubeStore`] to be notified whenever a new Cube is accepted.
/// Called synchronously from `add`, matching the single-threaded cooperative model of
/// `SPEC_FULL.md` §5.
pub trait CubeListener: Send + Sync {
    fn on_cube_added(&self, key: Key);
}
