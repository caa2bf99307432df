//! Live capture of GT7 telemetry: heartbeat, receive, decrypt, decode.

mod config;
mod connection;
pub mod crypto;
mod packet;
mod source;

pub use config::{Gt7Config, HEARTBEAT_PORT, TELEMETRY_PORT};
pub use connection::Gt7Connection;
pub use gt7_core::{DecodeError, TelemetrySample};
pub use packet::{PacketType, ParsePacketTypeError};
pub use source::{handle_datagram, Gt7Source, LinkState};

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("datagram of {0} bytes matches no known packet type")]
    UnknownPacketSize(usize),
    #[error("decrypted magic 0x{found:08X} is not 0x47375330")]
    BadMagic { found: u32 },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error("connection is already running")]
    AlreadyRunning,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SampleTx = crossbeam_channel::Sender<TelemetrySample>;
pub type SampleRx = crossbeam_channel::Receiver<TelemetrySample>;

/// Trait for any live source connector
#[async_trait::async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn run(&self, tx: SampleTx) -> Result<(), IngestError>;
}

pub fn channel() -> (SampleTx, SampleRx) {
    crossbeam_channel::unbounded()
}
