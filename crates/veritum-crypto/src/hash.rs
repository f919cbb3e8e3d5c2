use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use sha3::{Digest, Sha3_256};

use crate::CryptoError;

/// Size in bytes of a SHA3-256 digest.
pub const HASH_SIZE: usize = 32;

/// How often (in trial count) the proof-of-work loop checks its cancellation flag.
const POW_CHECK_INTERVAL: u32 = 1024;

/// SHA3-256 of `data`. Used for Cube hashing, FROZEN/PIC key derivation, and as the
/// hashcash digest the proof-of-work search targets.
#[must_use]
pub fn sha3_256(data: &[u8]) -> [u8; HASH_SIZE] {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Number of trailing zero *bits* in `hash`, scanning from the last byte backward.
#[must_use]
pub fn trailing_zero_bits(hash: &[u8; HASH_SIZE]) -> u32 {
    let mut bits = 0;
    for &byte in hash.iter().rev() {
        if byte == 0 {
            bits += 8;
            continue;
        }
        bits += byte.trailing_zeros();
        break;
    }
    bits
}

/// A hashcash difficulty: the minimum number of trailing zero bits a Cube's SHA3-256 hash
/// must have to be accepted. 0 accepts everything (used in tests); production deployments
/// pick something in the 8-20 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowPolicy {
    difficulty: u8,
}

impl PowPolicy {
    #[must_use]
    pub const fn new(difficulty: u8) -> Self {
        Self { difficulty }
    }

    #[must_use]
    pub const fn difficulty(self) -> u8 {
        self.difficulty
    }

    #[must_use]
    pub fn is_satisfied_by(self, hash: &[u8; HASH_SIZE]) -> bool {
        trailing_zero_bits(hash) >= u32::from(self.difficulty)
    }
}

/// Searches for a 4-byte big-endian nonce value to write into `blob[nonce_range]` such
/// that `sha3_256(blob)` satisfies `policy`. Returns the winning nonce value on success.
///
/// `cancel`, if given, is polled every [`POW_CHECK_INTERVAL`] trials so a caller running
/// this on a blocking thread pool can abort a search that is taking too long.
pub fn solve_pow(
    blob: &mut [u8],
    nonce_range: Range<usize>,
    policy: PowPolicy,
    cancel: Option<&AtomicBool>,
) -> Result<u32, CryptoError> {
    debug_assert_eq!(nonce_range.len(), 4, "nonce field must be exactly 4 bytes");
    let mut nonce: u32 = 0;
    loop {
        blob[nonce_range.clone()].copy_from_slice(&nonce.to_be_bytes());
        let hash = sha3_256(blob);
        if policy.is_satisfied_by(&hash) {
            return Ok(nonce);
        }
        if nonce % POW_CHECK_INTERVAL == 0 {
            if let Some(flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    tracing::trace!(nonce, "proof-of-work search cancelled");
                    return Err(CryptoError::PowCancelled);
                }
            }
        }
        nonce = nonce.checked_add(1).ok_or(CryptoError::PowCancelled)?;
    }
}
