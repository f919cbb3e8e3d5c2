//! Core value types shared by every layer of the Cube/Veritum stack.
//!
//! This crate has no dependency on any other crate in the workspace: it defines the
//! vocabulary (`Key`, `Timestamp`, `CubeType`, `FieldType`, `RelationshipType`) that the
//! codec, crypto, cube, store, and continuation crates all build on, the way
//! `kimberlite-types` anchors the rest of its workspace.

mod difficulty;
mod field_type;
mod key;
mod relationship;
mod timestamp;
mod ty;

pub use difficulty::{lifetime_epochs, DifficultyCurve, EPOCH_SECONDS};
pub use field_type::FieldType;
pub use key::Key;
pub use relationship::RelationshipType;
pub use timestamp::Timestamp;
pub use ty::CubeType;

/// Size in bytes of a compiled Cube blob. Every Cube, of any type, is exactly this long.
pub const CUBE_SIZE: usize = 1024;

/// Size in bytes of a [`Key`] (a SHA3-256 digest or an embedded Ed25519/X25519 public key).
pub const KEY_SIZE: usize = 32;
