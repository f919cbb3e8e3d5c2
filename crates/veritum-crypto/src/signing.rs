use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::CryptoError;

/// Size in bytes of an Ed25519 public key, as embedded in MUC/PMUC Cubes.
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Size in bytes of an Ed25519 signature.
pub const SIGNATURE_SIZE: usize = 64;

/// An Ed25519 signing keypair, used to compile and re-sign MUC/PMUC Cubes.
///
/// Mirrors the wrapper shape of `kimberlite-crypto`'s verified Ed25519 module, minus the
/// Coq proof-certificate layer that module also carries — this port has no counterpart
/// for that and reuses only the plain `ed25519-dalek` call pattern underneath it.
pub struct SigningKeyPair {
    signing_key: SigningKey,
}

impl SigningKeyPair {
    #[must_use]
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self { signing_key: SigningKey::generate(&mut csprng) }
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self { signing_key: SigningKey::from_bytes(bytes) }
    }

    #[must_use]
    pub fn public_key(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.signing_key.verifying_key().to_bytes()
    }

    #[must_use]
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_SIZE] {
        self.signing_key.sign(message).to_bytes()
    }
}

/// Verifies an Ed25519 signature made over `message` by the holder of `public_key`.
pub fn verify(
    public_key: &[u8; PUBLIC_KEY_SIZE],
    message: &[u8],
    signature: &[u8; SIGNATURE_SIZE],
) -> Result<(), CryptoError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key).map_err(|_| CryptoError::SignatureInvalid)?;
    let signature = Signature::from_bytes(signature);
    verifying_key.verify(message, &signature).map_err(|_| CryptoError::SignatureInvalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_then_verify_succeeds() {
        let pair = SigningKeyPair::generate();
        let message = b"a MUC cube body";
        let signature = pair.sign(message);
        verify(&pair.public_key(), message, &signature).unwrap();
    }

    #[test]
    fn tampered_message_fails_verification() {
        let pair = SigningKeyPair::generate();
        let signature = pair.sign(b"original");
        assert!(verify(&pair.public_key(), b"tampered", &signature).is_err());
    }

    #[test]
    fn wrong_key_fails_verification() {
        let pair = SigningKeyPair::generate();
        let other = SigningKeyPair::generate();
        let signature = pair.sign(b"message");
        assert!(verify(&other.public_key(), b"message", &signature).is_err());
    }
}
