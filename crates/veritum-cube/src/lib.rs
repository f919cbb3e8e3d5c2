//! Typed Cubes: compiling field lists into signed, proof-of-worked, content-addressed
//! 1024-byte records, and parsing them back.
//!
//! Grounded on `kimberlite-storage`'s `Record` (builder-style constructors, a
//! `compute_hash`-style derivation step, bounds-checked parsing) and
//! `kimberlite-crypto`'s plain `ed25519-dalek` call shape (stripped of its Coq
//! proof-certificate wrapper, which has no counterpart here).

mod cube;
mod error;
mod key_derivation;

pub use cube::{Cube, UncompiledCube};
pub use error::CubeError;
pub use key_derivation::derive_key;
