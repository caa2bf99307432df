use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::packet::PacketType;

/// Port the console listens on for heartbeats.
pub const HEARTBEAT_PORT: u16 = 33739;
/// Port the console sends telemetry to.
pub const TELEMETRY_PORT: u16 = 33740;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gt7Config {
    /// Local bind address for receiving packets from the console
    pub bind_addr: String,
    /// Console IP address to send heartbeat packets to
    pub console_ip: String,
    /// Packet variant to request via heartbeat
    pub packet_type: PacketType,
    pub heartbeat_interval_ms: u64,
    /// The link counts as lost after this long without a decodable datagram
    pub recv_timeout_ms: u64,
}

impl Gt7Config {
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_millis(self.heartbeat_interval_ms)
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }
}

impl Default for Gt7Config {
    fn default() -> Self {
        Self {
            bind_addr: format!("0.0.0.0:{TELEMETRY_PORT}"),
            console_ip: "192.168.1.100".into(),
            packet_type: PacketType::default(),
            heartbeat_interval_ms: 800,
            recv_timeout_ms: 2_000,
        }
    }
}
