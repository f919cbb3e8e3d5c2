//! Content-addressed Cube storage: the [`CubeStore`] trait, its `InMemoryCubeStore`
//! reference implementation, and the per-type contest rules that resolve key collisions.
//!
//! Grounded on `kimberlite-storage::Storage`'s manager-with-lock pattern, pared down to
//! an in-memory map since this store has no on-disk format to manage.

mod contest;
mod error;
mod store;
mod traits;

pub use contest::{contest, Winner};
pub use error::StoreError;
pub use store::InMemoryCubeStore;
pub use traits::{AddOutcome, CubeListener, CubeStore};
