use crate::aead::AEAD_NONCE_SIZE;

/// Derives the next chunk's nonce from the previous one: `H(nonce_i)` truncated to
/// [`AEAD_NONCE_SIZE`] bytes.
///
/// The reference design chains nonces with BLAKE2b; this port uses `blake3` instead (see
/// `SPEC_FULL.md` §10.2) since it is already the project's general-purpose hash and is
/// equally suitable here — both are keyless cryptographic hashes with no structure an
/// attacker could exploit for this derivation.
#[must_use]
pub fn next_nonce(previous: &[u8; AEAD_NONCE_SIZE]) -> [u8; AEAD_NONCE_SIZE] {
    let digest = blake3::hash(previous);
    let mut nonce = [0u8; AEAD_NONCE_SIZE];
    nonce.copy_from_slice(&digest.as_bytes()[..AEAD_NONCE_SIZE]);
    nonce
}

/// A fresh random nonce, used to start a new session (pre-shared-key and key-distribution
/// framing variants).
#[must_use]
pub fn random_nonce() -> [u8; AEAD_NONCE_SIZE] {
    let mut nonce = [0u8; AEAD_NONCE_SIZE];
    getrandom::getrandom(&mut nonce).expect("the OS random source is unavailable");
    nonce
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_is_deterministic() {
        let start = [1u8; AEAD_NONCE_SIZE];
        assert_eq!(next_nonce(&start), next_nonce(&start));
    }

    #[test]
    fn chain_changes_the_nonce() {
        let start = [1u8; AEAD_NONCE_SIZE];
        assert_ne!(next_nonce(&start), start);
    }

    #[test]
    fn random_nonces_are_not_trivially_equal() {
        assert_ne!(random_nonce(), random_nonce());
    }
}
