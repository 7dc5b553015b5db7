//! Passive virtual-bus observer: binds the broadcast destination port,
//! decodes each 13-byte frame and prints the reading. Purely a reader;
//! all safety decisions stay in the gateway.

use anyhow::Context;
use bytes::Bytes;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use ecubridge_lib::frame::BusFrame;
use ecubridge_lib::safety::SafetyStatus;
use std::net::{SocketAddr, UdpSocket};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Listen to frames on the virtual CAN bus")]
struct Args {
    /// Address to listen on for broadcast frames
    #[arg(long, env = "ECUBRIDGE_BUS_LISTEN", default_value = "127.0.0.1:5000")]
    listen: SocketAddr,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbosity.tracing_level_filter())
        .init();

    let socket = UdpSocket::bind(args.listen)
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!("listening on udp {}", args.listen);

    let mut buf = [0u8; 64];
    loop {
        let (len, _peer) = socket.recv_from(&mut buf).context("recv failed")?;
        let frame = match BusFrame::try_from(Bytes::copy_from_slice(&buf[..len])) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("ignoring datagram: {e}");
                continue;
            }
        };

        let voltage_mv = u16::from_be_bytes([frame.data[0], frame.data[1]]);
        let temperature_c = frame.data[2];
        match SafetyStatus::try_from(frame.status_code()) {
            Ok(status) => info!(
                frame_id = format_args!("{:#05x}", frame.frame_id),
                voltage_mv,
                temperature_c,
                status = %status,
                "rx"
            ),
            Err(_) => warn!(
                frame_id = format_args!("{:#05x}", frame.frame_id),
                status_code = frame.status_code(),
                "rx frame with unknown status code"
            ),
        }
    }
}
