//! # Veritum
//!
//! Content-addressed Cube storage with end-to-end encrypted, one-to-many message
//! assembly on top.
//!
//! A [`Cube`] is a fixed-size, content-addressed binary record (see `veritum-cube`).
//! [`Veritum`] chunks an arbitrary plaintext across one or more Cubes, linked by
//! `CONTINUED_IN` references, and — when recipients or a pre-shared key are supplied —
//! seals every chunk under a symmetric content key distributed per [`EncryptionVariant`].
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                            Veritum                                │
//! │  ┌───────────┐   ┌──────────────┐   ┌───────┐   ┌─────────┐  │
//! │  │  codec    │ → │  cube        │ → │ store │   │continuation│ │
//! │  │(TLV+      │   │(compile/     │   │(add/  │   │(split/    │ │
//! │  │ positional)│   │ verify/PoW)  │   │ get)  │   │ recombine)│ │
//! │  └───────────┘   └──────────────┘   └───────┘   └─────────┘  │
//! │                          ↑ built on                             │
//! │                      crypto (hash/sign/agree/AEAD)               │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use veritum::{RecipientCredential, Veritum, VeritumOptions};
//! use veritum_crypto::{PowPolicy, SecretKey};
//! use veritum_types::CubeType;
//!
//! let recipient = SecretKey::generate();
//! let options = VeritumOptions { recipients: vec![recipient.public_key()], ..Default::default() };
//! let veritum = Veritum::compile(b"hello", CubeType::Frozen, PowPolicy::new(0), options)?;
//!
//! let plaintext = Veritum::open(
//!     veritum.content_cubes(),
//!     veritum.key_distribution_cubes(),
//!     &RecipientCredential::Secret(recipient),
//! )?;
//! assert_eq!(plaintext, b"hello");
//! # Ok::<(), veritum::VeritumError>(())
//! ```
//!
//! # Modules
//!
//! - **Facade**: [`Veritum`], [`VeritumOptions`], [`RecipientCredential`] — main API
//! - **Framing**: [`EncryptionVariant`] — which chunk-crypto shape a chunk uses

mod error;
mod options;
mod recipients;
mod variant;
mod veritum;

pub use error::VeritumError;
pub use options::{RecipientCredential, VeritumOptions, DEFAULT_PLAINTEXT_CHUNK_CAPACITY};
pub use variant::{EncryptionVariant, KEY_DISTRIBUTION_RELATIONSHIP};
pub use veritum::Veritum;

// Re-export the foundation layers for advanced usage (building custom stores/listeners,
// inspecting raw Cube fields, driving the continuation splitter directly).
pub use veritum_codec::{Field, FieldDefinition};
pub use veritum_crypto::{PowPolicy, SecretKey, SigningKeyPair};
pub use veritum_cube::{Cube, CubeError, UncompiledCube};
pub use veritum_continuation::{ContinuationError, ContinuationOptions, RootParams};
pub use veritum_store::{AddOutcome, CubeListener, CubeStore, InMemoryCubeStore, StoreError};
pub use veritum_types::{CubeType, FieldType, Key, RelationshipType, Timestamp};
