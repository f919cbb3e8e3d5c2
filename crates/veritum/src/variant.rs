/// Relationship tag linking a Veritum's content chain to a key-distribution chunk, used
/// when the recipient key-slot table doesn't fit inline in the content chunk itself
/// (`SPEC_FULL.md` §4.5).
pub const KEY_DISTRIBUTION_RELATIONSHIP: u8 = 1;

/// Which chunk-crypto framing a content chunk was sealed under (`SPEC_FULL.md` §4.5's
/// framing-variants table), chosen explicitly at compile time rather than left as
/// scattered booleans. `Veritum::open` does not need to detect this ahead of time: every
/// variant's `ENCRYPTED` value is self-describing enough that the decrypt pipeline can
/// just try the framing the supplied credential implies, per §4.5's decrypt pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncryptionVariant {
    /// A follow-on chunk in an already-established session: `ENCRYPTED` is bare
    /// `ciphertext‖tag`, the nonce derived by chaining from the previous chunk's.
    Continuation,
    /// A single symmetric key, shared with every recipient out of band.
    PreShared,
    /// Exactly one recipient: the content key comes directly from ECDH, no key-slot
    /// table needed.
    SingleRecipient,
    /// More than one recipient: a random content key is wrapped once per recipient into
    /// a key-slot table, either inline in the root chunk or, once the table outgrows one
    /// chunk, split across a separate set of key-distribution chunks.
    MultiRecipient,
}
