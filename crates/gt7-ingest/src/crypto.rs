//! Salsa20 payload decryption.
//!
//! The nonce seed is the little-endian u32 at 0x40 of the datagram as received:
//! `iv1 = seed`, `iv2 = iv1 ^ xor_key`, nonce = `iv2_le ++ iv1_le`. The keystream covers the
//! whole datagram and a correct key yields the "0S7G" magic in the first four bytes.

use cipher::{KeyIvInit, StreamCipher};
use salsa20::Salsa20;

use crate::packet::PacketType;
use crate::IngestError;

/// First 32 bytes of "Simulator Interface Packet GT7 ver 0.0".
const KEY: &[u8; 32] = b"Simulator Interface Packet GT7 v";
const SEED_OFFSET: usize = 0x40;
pub const MAGIC: u32 = 0x4737_5330;

fn nonce(seed: u32, xor_key: u32) -> [u8; 8] {
    let mut nonce = [0u8; 8];
    nonce[..4].copy_from_slice(&(seed ^ xor_key).to_le_bytes());
    nonce[4..].copy_from_slice(&seed.to_le_bytes());
    nonce
}

fn apply_keystream(buf: &mut [u8], seed: u32, xor_key: u32) {
    let nonce = nonce(seed, xor_key);
    let mut stream = Salsa20::new(KEY.into(), (&nonce).into());
    stream.apply_keystream(buf);
}

/// Decrypt one datagram. The packet type is inferred from its length.
pub fn decrypt(pkt: &[u8]) -> Result<Vec<u8>, IngestError> {
    let packet_type =
        PacketType::from_len(pkt.len()).ok_or(IngestError::UnknownPacketSize(pkt.len()))?;
    let seed = u32::from_le_bytes([
        pkt[SEED_OFFSET],
        pkt[SEED_OFFSET + 1],
        pkt[SEED_OFFSET + 2],
        pkt[SEED_OFFSET + 3],
    ]);

    let mut payload = pkt.to_vec();
    apply_keystream(&mut payload, seed, packet_type.xor_key());

    let magic = u32::from_le_bytes([payload[0], payload[1], payload[2], payload[3]]);
    if magic != MAGIC {
        return Err(IngestError::BadMagic { found: magic });
    }
    Ok(payload)
}

/// Encrypt a plaintext datagram the way the console does, using `seed` as the nonce seed.
///
/// The seed overwrites bytes 0x40..0x44 of the result, so those bytes do not survive a
/// round trip through [`decrypt`].
pub fn seal(plain: &[u8], seed: u32) -> Result<Vec<u8>, IngestError> {
    let packet_type =
        PacketType::from_len(plain.len()).ok_or(IngestError::UnknownPacketSize(plain.len()))?;
    let mut out = plain.to_vec();
    apply_keystream(&mut out, seed, packet_type.xor_key());
    out[SEED_OFFSET..SEED_OFFSET + 4].copy_from_slice(&seed.to_le_bytes());
    Ok(out)
}
