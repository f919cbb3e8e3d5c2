use veritum_cube::Cube;
use veritum_crypto::trailing_zero_bits;
use veritum_types::{lifetime_epochs, CubeType, Timestamp, EPOCH_SECONDS};

/// Which of two same-keyed Cubes a contest keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Local,
    Incoming,
}

/// The hashcash difficulty a Cube actually achieved, read off its hash rather than a
/// declared target — a receiving store has no other way to know what difficulty the
/// compiling side aimed for, and actual trailing zero bits is the only auditable number
/// available. Used only to size PIC/PMUC expiry windows.
fn effective_difficulty(cube: &Cube) -> u8 {
    trailing_zero_bits(&cube.hash()).min(u32::from(u8::MAX)) as u8
}

fn expiry(cube: &Cube) -> Timestamp {
    let epochs = lifetime_epochs(effective_difficulty(cube));
    cube.date().unwrap_or(Timestamp::EPOCH).saturating_add_secs(epochs * EPOCH_SECONDS)
}

/// Decides which of `local` (already stored) and `incoming` (candidate) survives a
/// key collision, per the per-type rules in `SPEC_FULL.md` §4.3.
#[must_use]
pub fn contest(local: &Cube, incoming: &Cube) -> Winner {
    match local.cube_type().base() {
        // Collision-resistant hash keys make a genuine tie practically impossible;
        // local wins as the safe fallback.
        CubeType::Frozen => Winner::Local,

        CubeType::Pic => {
            let (local_expiry, incoming_expiry) = (expiry(local), expiry(incoming));
            if incoming_expiry > local_expiry {
                Winner::Incoming
            } else {
                Winner::Local
            }
        }

        CubeType::Muc => {
            let (local_date, incoming_date) = (local.date().unwrap_or(Timestamp::EPOCH), incoming.date().unwrap_or(Timestamp::EPOCH));
            if incoming_date > local_date {
                Winner::Incoming
            } else {
                Winner::Local
            }
        }

        CubeType::Pmuc => {
            let (local_count, incoming_count) = (local.update_count().unwrap_or(0), incoming.update_count().unwrap_or(0));
            if incoming_count != local_count {
                return if incoming_count > local_count { Winner::Incoming } else { Winner::Local };
            }
            let (local_expiry, incoming_expiry) = (expiry(local), expiry(incoming));
            if incoming_expiry > local_expiry {
                Winner::Incoming
            } else {
                Winner::Local
            }
        }

        // `base()` only ever returns Frozen, Pic, Muc, or Pmuc.
        CubeType::FrozenNotify | CubeType::PicNotify | CubeType::MucNotify | CubeType::PmucNotify => unreachable!("base() only returns Frozen, Pic, Muc, Pmuc"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veritum_crypto::{PowPolicy, SigningKeyPair};
    use veritum_cube::UncompiledCube;

    fn frozen(payload: &[u8]) -> Cube {
        UncompiledCube::new(CubeType::Frozen, vec![veritum_codec::Field::new(veritum_types::FieldType::Payload, payload.to_vec())])
            .compile(PowPolicy::new(0))
            .unwrap()
    }

    fn muc_at(date: Timestamp) -> Cube {
        UncompiledCube::new(CubeType::Muc, vec![])
            .with_signing_key(SigningKeyPair::generate())
            .with_date(date)
            .compile(PowPolicy::new(0))
            .unwrap()
    }

    fn pmuc_with_count(count: u32) -> Cube {
        UncompiledCube::new(CubeType::Pmuc, vec![])
            .with_signing_key(SigningKeyPair::generate())
            .with_update_count(count)
            .compile(PowPolicy::new(0))
            .unwrap()
    }

    #[test]
    fn frozen_always_keeps_local() {
        let local = frozen(b"a");
        let incoming = frozen(b"b");
        assert_eq!(contest(&local, &incoming), Winner::Local);
    }

    #[test]
    fn muc_later_date_wins() {
        let local = muc_at(Timestamp::from_secs(100));
        let incoming = muc_at(Timestamp::from_secs(200));
        assert_eq!(contest(&local, &incoming), Winner::Incoming);
        assert_eq!(contest(&incoming, &local), Winner::Local);
    }

    #[test]
    fn muc_tie_keeps_local() {
        let local = muc_at(Timestamp::from_secs(100));
        let incoming = muc_at(Timestamp::from_secs(100));
        assert_eq!(contest(&local, &incoming), Winner::Local);
    }

    #[test]
    fn pmuc_higher_count_wins_regardless_of_expiry() {
        let local = pmuc_with_count(1);
        let incoming = pmuc_with_count(2);
        assert_eq!(contest(&local, &incoming), Winner::Incoming);
    }

    #[test]
    fn pmuc_tied_count_falls_back_to_expiry_then_local() {
        let local = pmuc_with_count(5);
        let incoming = pmuc_with_count(5);
        assert_eq!(contest(&local, &incoming), Winner::Local);
    }
}
