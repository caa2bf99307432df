use serde::{Deserialize, Serialize};

use crate::DecodeError;

/// Layout revision of a datagram, selected purely by its length.
///
/// Tiers are cumulative and ordered: `Full` carries every `Extended` field, which carries
/// every `Base` field. Offsets never move between tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Tier {
    /// Everything up to and including the car id at 0x124.
    #[default]
    Base,
    /// Adds wheel rotation, a filler float, sway, heave and surge (0x128..0x13C).
    Extended,
    /// Adds filtered inputs, energy recovery and the reserved block at 0x13C..0x158.
    Full,
}

impl Tier {
    pub const BASE_LEN: usize = 0x128;
    pub const EXTENDED_LEN: usize = 0x13C;
    pub const FULL_LEN: usize = 0x158;

    /// Smallest buffer length that carries every field of this tier.
    pub const fn min_len(self) -> usize {
        match self {
            Tier::Base => Self::BASE_LEN,
            Tier::Extended => Self::EXTENDED_LEN,
            Tier::Full => Self::FULL_LEN,
        }
    }

    /// Resolve the richest tier a buffer of `len` bytes can hold.
    pub fn from_len(len: usize) -> Result<Self, DecodeError> {
        if len >= Self::FULL_LEN {
            Ok(Tier::Full)
        } else if len >= Self::EXTENDED_LEN {
            Ok(Tier::Extended)
        } else if len >= Self::BASE_LEN {
            Ok(Tier::Base)
        } else {
            Err(DecodeError::InsufficientBuffer { len, min: Self::BASE_LEN })
        }
    }

    pub fn has_motion(self) -> bool {
        self >= Tier::Extended
    }

    pub fn has_filtered_inputs(self) -> bool {
        self >= Tier::Full
    }
}
