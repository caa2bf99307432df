use anyhow::{Context, Result};
use clap::Args;
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

use gt7_ingest::{channel, handle_datagram, Gt7Config, Gt7Connection, PacketType, SampleRx};

#[derive(Args)]
pub struct ListenArgs {
    /// IP address of the console to send heartbeats to
    #[arg(long, env = "GT7_CONSOLE_IP")]
    pub console_ip: String,

    /// Local address to receive telemetry on
    #[arg(long, env = "GT7_BIND_ADDR", default_value = "0.0.0.0:33740")]
    pub bind: String,

    /// Packet variant to request: A, B or ~
    #[arg(long, env = "GT7_PACKET_TYPE", default_value = "~")]
    pub packet_type: PacketType,

    /// Stop after this many samples
    #[arg(long)]
    pub max_samples: Option<u64>,
}

#[derive(Args)]
pub struct DecodeArgs {
    /// File holding one datagram
    pub path: PathBuf,

    /// The dump is still encrypted, as captured off the wire
    #[arg(long)]
    pub encrypted: bool,
}

pub async fn listen(args: ListenArgs) -> Result<()> {
    let cfg = Gt7Config {
        bind_addr: args.bind,
        console_ip: args.console_ip,
        packet_type: args.packet_type,
        ..Gt7Config::default()
    };
    let (tx, rx) = channel();
    let mut conn = Gt7Connection::new(cfg);
    conn.start(tx)?;
    info!(config = ?conn.config(), "capturing");

    let written = capture(
        &mut conn,
        rx,
        args.max_samples,
        std::io::stdout(),
        tokio::signal::ctrl_c(),
    )
    .await?;
    info!(written, decoded = conn.link().decoded(), rejected = conn.link().rejected(), "capture finished");
    Ok(())
}

/// Write samples as NDJSON until `max_samples` is reached, the source ends or `shutdown`
/// resolves, then stop the connection. Returns the number of lines written.
async fn capture(
    conn: &mut Gt7Connection,
    rx: SampleRx,
    max_samples: Option<u64>,
    out: impl Write + Send + 'static,
    shutdown: impl Future<Output = std::io::Result<()>>,
) -> Result<u64> {
    let mut writer = tokio::task::spawn_blocking(move || write_samples(&rx, max_samples, out));

    let finished = tokio::select! {
        res = conn.wait() => {
            res?;
            None
        }
        done = &mut writer => Some(done),
        res = shutdown => {
            res?;
            info!("interrupted");
            None
        }
    };
    conn.stop().await;

    // once the connection is stopped its sender is gone and the writer drains out
    let written = match finished {
        Some(done) => done??,
        None => writer.await??,
    };
    Ok(written)
}

fn write_samples(rx: &SampleRx, max_samples: Option<u64>, mut out: impl Write) -> Result<u64> {
    let mut written = 0;
    for sample in rx.iter() {
        writeln!(out, "{}", sample.to_json_line()?)?;
        written += 1;
        if max_samples.is_some_and(|max| written >= max) {
            break;
        }
    }
    out.flush()?;
    Ok(written)
}

pub fn decode(args: DecodeArgs) -> Result<()> {
    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("read {}", args.path.display()))?;
    let sample = if args.encrypted {
        handle_datagram(&bytes)?
    } else {
        gt7_core::decode(&bytes)?
    };
    println!("{}", sample.to_json()?);
    Ok(())
}
