use std::fmt;

use crate::KEY_SIZE;

/// A 32-byte content or identity key.
///
/// For immutable Cube types the key is a SHA3-256 digest of (part of) the compiled blob;
/// for mutable types it is the embedded Ed25519/X25519 public key verbatim. Either way it
/// is just 32 opaque bytes at this layer — derivation lives in `veritum-cube`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key([u8; KEY_SIZE]);

impl Key {
    /// An all-zero key, used as a placeholder before a continuation reference is resolved.
    pub const ZERO: Key = Key([0u8; KEY_SIZE]);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != KEY_SIZE {
            return None;
        }
        let mut buf = [0u8; KEY_SIZE];
        buf.copy_from_slice(bytes);
        Some(Self(buf))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }

    #[must_use]
    pub const fn is_zero(&self) -> bool {
        let mut i = 0;
        while i < KEY_SIZE {
            if self.0[i] != 0 {
                return false;
            }
            i += 1;
        }
        true
    }
}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; KEY_SIZE]> for Key {
    fn from(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({:02x}{:02x}{:02x}{:02x}…)", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Key {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}
