//! Splits an over-size field list across a chain of Cubes linked by `CONTINUED_IN`
//! references, and recombines such a chain back into one field list.
//!
//! Grounded on the two-stage plan-then-compile shape of `kimberlite-storage`'s
//! `pipeline.rs`, adapted from a compression pipeline into the field-splitting pipeline
//! `SPEC_FULL.md` §4.4 describes, and re-expressed over a flat `Vec`-backed arena rather
//! than the reference design's mutable linked worklist (see [`plan`]'s doc comment).

mod error;
mod options;
mod plan;
mod recombine;
mod splitter;

pub use error::ContinuationError;
pub use options::{ContinuationOptions, DEFAULT_CHUNK_CAPACITY, MIN_CHUNK};
pub use plan::{plan, Plan, CONTINUED_IN_ENCODED_LEN};
pub use recombine::recombine;
pub use splitter::{split, RootParams};
