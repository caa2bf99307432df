//! Decoder for decrypted Gran Turismo 7 telemetry datagrams.
//!
//! `decode` is a pure function of the buffer plus the wall-clock capture time: resolve the
//! layout [`Tier`] from the length, extract every fixed-offset field, then compute the
//! derived metrics. It never logs, retries or panics on input.

pub mod derive;
mod error;
pub mod fields;
pub mod layout;
mod reader;
mod sample;
mod tier;

use time::OffsetDateTime;

pub use error::DecodeError;
pub use sample::{ParseSlipRatioError, ReservedBlock, Rotation, SlipRatio, TelemetrySample, Vec3, Wheels};
pub use tier::Tier;

/// Decode one datagram, stamping the sample with the current UTC time.
pub fn decode(buf: &[u8]) -> Result<TelemetrySample, DecodeError> {
    decode_at(buf, OffsetDateTime::now_utc())
}

/// Decode one datagram with an explicit capture time.
pub fn decode_at(buf: &[u8], captured_at: OffsetDateTime) -> Result<TelemetrySample, DecodeError> {
    let tier = Tier::from_len(buf.len())?;
    let (mut sample, raw) = fields::decode_fields(buf, tier, captured_at)?;
    derive::apply(&mut sample, &raw)?;
    Ok(sample)
}
