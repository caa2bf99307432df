use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use gt7_core::Tier;

/// Datagram flavour requested from the console with the heartbeat byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketType {
    /// 296 bytes, the base layout.
    A,
    /// 316 bytes, adds wheel rotation and sway/heave/surge.
    B,
    /// 344 bytes, adds filtered inputs and energy recovery.
    #[default]
    #[serde(rename = "~")]
    Tilde,
}

impl PacketType {
    pub const ALL: [PacketType; 3] = [PacketType::A, PacketType::B, PacketType::Tilde];

    pub const fn heartbeat(self) -> &'static [u8] {
        match self {
            PacketType::A => b"A",
            PacketType::B => b"B",
            PacketType::Tilde => b"~",
        }
    }

    pub const fn datagram_len(self) -> usize {
        match self {
            PacketType::A => Tier::BASE_LEN,
            PacketType::B => Tier::EXTENDED_LEN,
            PacketType::Tilde => Tier::FULL_LEN,
        }
    }

    /// Constant XORed into the nonce seed before decryption.
    pub const fn xor_key(self) -> u32 {
        match self {
            PacketType::A => 0xDEAD_BEAF,
            PacketType::B => 0xDEAD_BEEF,
            PacketType::Tilde => 0x55FA_BB4F,
        }
    }

    pub fn from_len(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.datagram_len() == len)
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hb = self.heartbeat();
        write!(f, "{}", hb[0] as char)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown packet type `{0}`, expected one of A, B, ~")]
pub struct ParsePacketTypeError(String);

impl FromStr for PacketType {
    type Err = ParsePacketTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(PacketType::A),
            "B" | "b" => Ok(PacketType::B),
            "~" | "tilde" => Ok(PacketType::Tilde),
            other => Err(ParsePacketTypeError(other.to_owned())),
        }
    }
}
