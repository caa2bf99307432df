use anyhow::Context;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use gt7_core::TelemetrySample;

use crate::config::{Gt7Config, HEARTBEAT_PORT};
use crate::{crypto, IngestError, SampleTx, TelemetrySource};

/// Receive buffer; comfortably larger than the biggest known datagram.
const RECV_BUF_LEN: usize = 0x800;

/// Link health shared between a running source and whoever owns it.
#[derive(Debug, Default)]
pub struct LinkState {
    connected: AtomicBool,
    decoded: AtomicU64,
    rejected: AtomicU64,
}

impl LinkState {
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Acquire)
    }

    pub(crate) fn set_connected(&self, connected: bool) -> bool {
        self.connected.swap(connected, Ordering::AcqRel)
    }

    /// Datagrams decoded into samples since creation.
    pub fn decoded(&self) -> u64 {
        self.decoded.load(Ordering::Relaxed)
    }

    /// Datagrams dropped because they failed decryption or decoding.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

/// Decrypt and decode one datagram as received from the console.
pub fn handle_datagram(pkt: &[u8]) -> Result<TelemetrySample, IngestError> {
    let payload = crypto::decrypt(pkt)?;
    Ok(gt7_core::decode(&payload)?)
}

pub struct Gt7Source {
    cfg: Gt7Config,
    link: Arc<LinkState>,
}

impl Gt7Source {
    pub fn new(cfg: Gt7Config) -> Self {
        Self::with_link(cfg, Arc::default())
    }

    pub fn with_link(cfg: Gt7Config, link: Arc<LinkState>) -> Self {
        Self { cfg, link }
    }

    pub fn link(&self) -> Arc<LinkState> {
        Arc::clone(&self.link)
    }

    /// Returns false once the sample receiver has gone away.
    fn on_datagram(&self, pkt: &[u8], tx: &SampleTx) -> bool {
        match handle_datagram(pkt) {
            Ok(sample) => {
                self.link.decoded.fetch_add(1, Ordering::Relaxed);
                if !self.link.set_connected(true) {
                    info!(car_id = sample.car_id, tier = ?sample.tier, "GT7 telemetry flowing");
                }
                tx.send(sample).is_ok()
            }
            Err(e) => {
                self.link.rejected.fetch_add(1, Ordering::Relaxed);
                debug!(error = %e, len = pkt.len(), "dropping GT7 datagram");
                true
            }
        }
    }
}

#[async_trait::async_trait]
impl TelemetrySource for Gt7Source {
    async fn run(&self, tx: SampleTx) -> Result<(), IngestError> {
        let console_ip: IpAddr = self
            .cfg
            .console_ip
            .parse()
            .with_context(|| format!("console ip {}", self.cfg.console_ip))?;
        let console = SocketAddr::new(console_ip, HEARTBEAT_PORT);
        let socket = UdpSocket::bind(&self.cfg.bind_addr)
            .await
            .with_context(|| format!("bind {}", self.cfg.bind_addr))?;
        info!(bind = %self.cfg.bind_addr, %console, packet_type = %self.cfg.packet_type, "GT7 source listening");

        // the console keeps streaming only while heartbeats keep arriving
        let heartbeat = self.cfg.packet_type.heartbeat();
        let mut hb_interval = time::interval(self.cfg.heartbeat_interval());
        hb_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let recv_timeout = self.cfg.recv_timeout();
        let mut last_packet = Instant::now();

        let mut buf = vec![0u8; RECV_BUF_LEN];
        loop {
            tokio::select! {
                _ = hb_interval.tick() => {
                    if let Err(e) = socket.send_to(heartbeat, console).await {
                        warn!(error = %e, %console, "GT7 heartbeat failed");
                    }
                    if last_packet.elapsed() > recv_timeout && self.link.set_connected(false) {
                        warn!(timeout_ms = self.cfg.recv_timeout_ms, "GT7 telemetry stalled");
                    }
                }
                recv = socket.recv_from(&mut buf) => match recv {
                    Ok((len, _peer)) => {
                        last_packet = Instant::now();
                        if !self.on_datagram(&buf[..len], &tx) {
                            debug!("sample receiver dropped, stopping GT7 source");
                            self.link.set_connected(false);
                            return Ok(());
                        }
                    }
                    Err(e) => warn!(error = %e, "GT7 receive failed"),
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel;

    fn sealed_packet(car_id: i32) -> Vec<u8> {
        let mut plain = vec![0u8; gt7_core::Tier::FULL_LEN];
        plain[..4].copy_from_slice(&crypto::MAGIC.to_le_bytes());
        plain[0x124..0x128].copy_from_slice(&car_id.to_le_bytes());
        plain[0x90] = 0x21;
        crypto::seal(&plain, 0xCAFE_F00D).unwrap()
    }

    #[test]
    fn handle_datagram_decrypts_then_decodes() {
        let s = handle_datagram(&sealed_packet(1_234)).unwrap();
        assert_eq!(s.car_id, 1_234);
        assert_eq!((s.current_gear, s.suggested_gear), (1, 2));
        assert_eq!(s.tier, gt7_core::Tier::Full);
    }

    #[test]
    fn handle_datagram_surfaces_decode_errors() {
        let mut plain = vec![0u8; gt7_core::Tier::FULL_LEN];
        plain[..4].copy_from_slice(&crypto::MAGIC.to_le_bytes());
        plain[0x13D] = 255;
        let sealed = crypto::seal(&plain, 1).unwrap();
        assert!(matches!(
            handle_datagram(&sealed),
            Err(IngestError::Decode(gt7_core::DecodeError::MalformedNumeric { .. }))
        ));
    }

    #[test]
    fn datagrams_update_link_state() {
        let source = Gt7Source::new(Gt7Config::default());
        let link = source.link();
        let (tx, rx) = channel();

        assert!(source.on_datagram(&sealed_packet(9), &tx));
        assert!(source.on_datagram(&[0u8; 12], &tx));
        assert!(link.is_connected());
        assert_eq!((link.decoded(), link.rejected()), (1, 1));
        assert_eq!(rx.try_recv().unwrap().car_id, 9);
        assert!(rx.try_recv().is_err());

        drop(rx);
        assert!(!source.on_datagram(&sealed_packet(9), &tx));
    }
}
