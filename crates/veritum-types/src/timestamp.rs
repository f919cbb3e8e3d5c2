use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Size in bytes of a [`Timestamp`] on the wire: seconds since the Unix epoch, big-endian,
/// truncated to 5 bytes (good until the year 36812).
pub const TIMESTAMP_SIZE: usize = 5;

/// Seconds since the Unix epoch, as carried by a Cube's `DATE` positional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Timestamp = Timestamp(0);

    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs)
    }

    #[must_use]
    pub const fn as_secs(self) -> u64 {
        self.0
    }

    /// Wall-clock time of construction, truncated to whole seconds.
    #[must_use]
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_secs();
        Self(secs)
    }

    /// Decodes a big-endian 5-byte wire representation.
    #[must_use]
    pub fn from_wire_bytes(bytes: [u8; TIMESTAMP_SIZE]) -> Self {
        let mut buf = [0u8; 8];
        buf[3..].copy_from_slice(&bytes);
        Self(u64::from_be_bytes(buf))
    }

    /// Encodes to the big-endian 5-byte wire representation.
    #[must_use]
    pub fn to_wire_bytes(self) -> [u8; TIMESTAMP_SIZE] {
        let full = self.0.to_be_bytes();
        let mut out = [0u8; TIMESTAMP_SIZE];
        out.copy_from_slice(&full[3..]);
        out
    }

    #[must_use]
    pub fn saturating_add_secs(self, secs: u64) -> Self {
        Self(self.0.saturating_add(secs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_roundtrip() {
        let ts = Timestamp::from_secs(0x00_1122_3344);
        assert_eq!(Timestamp::from_wire_bytes(ts.to_wire_bytes()), ts);
    }

    #[test]
    fn wire_bytes_are_big_endian() {
        let ts = Timestamp::from_secs(1);
        assert_eq!(ts.to_wire_bytes(), [0, 0, 0, 0, 1]);
    }

    #[test]
    fn now_is_after_epoch() {
        assert!(Timestamp::now() > Timestamp::EPOCH);
    }
}
