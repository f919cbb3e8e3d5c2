use x25519_dalek::{PublicKey, StaticSecret};

/// Size in bytes of an X25519 public key or shared secret.
pub const AGREEMENT_KEY_SIZE: usize = 32;

/// An X25519 secret used for Diffie-Hellman agreement.
///
/// The spec's reference design calls these "ephemeral" sender keys, but a single
/// multi-recipient key-distribution chunk needs to run Diffie-Hellman against every
/// recipient's public key from the *same* sender secret. `x25519_dalek::EphemeralSecret`
/// is deliberately single-use (its `diffie_hellman` consumes `self`), so this port uses
/// the reusable `StaticSecret` for the sender side and simply discards it after one chunk
/// is finalized — reusable API, one-shot usage pattern, same effect.
#[derive(Clone)]
pub struct SecretKey(StaticSecret);

impl SecretKey {
    #[must_use]
    pub fn generate() -> Self {
        Self(StaticSecret::random_from_rng(rand::rngs::OsRng))
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; AGREEMENT_KEY_SIZE]) -> Self {
        Self(StaticSecret::from(bytes))
    }

    #[must_use]
    pub fn public_key(&self) -> [u8; AGREEMENT_KEY_SIZE] {
        PublicKey::from(&self.0).to_bytes()
    }

    /// Raw X25519 shared secret with `their_public`. Callers must run this through a KDF
    /// (or, as this port does for chunk crypto, use it directly as an AEAD key material
    /// input — see `veritum-crypto::aead`) rather than using it as a key verbatim.
    #[must_use]
    pub fn diffie_hellman(&self, their_public: &[u8; AGREEMENT_KEY_SIZE]) -> [u8; AGREEMENT_KEY_SIZE] {
        self.0.diffie_hellman(&PublicKey::from(*their_public)).to_bytes()
    }
}
