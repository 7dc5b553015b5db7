use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use ecubridge_lib::Bridge;
use ecubridge_lib::transport::{ThreadSleep, UdpBroadcaster, connect_sensor};
use std::net::SocketAddr;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bridge a TCP battery sensor stream onto a virtual CAN bus over UDP"
)]
struct Args {
    /// Sensor TCP address
    #[arg(long, env = "ECUBRIDGE_SENSOR_ADDR", default_value = "127.0.0.1:4000")]
    sensor: SocketAddr,

    /// Virtual bus UDP destination
    #[arg(long, env = "ECUBRIDGE_BUS_ADDR", default_value = "127.0.0.1:5000")]
    bus: SocketAddr,

    /// Seconds to wait between connection attempts while the sensor is down
    #[arg(long, default_value_t = 2)]
    retry_secs: u64,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbosity.tracing_level_filter())
        .init();

    let broadcaster = match UdpBroadcaster::new(args.bus) {
        Ok(broadcaster) => broadcaster,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!("virtual bus ready, broadcasting to udp {}", args.bus);

    let stream = connect_sensor(
        args.sensor,
        Duration::from_secs(args.retry_secs),
        &mut ThreadSleep,
    );

    let mut bridge = Bridge::new(stream, broadcaster);
    info!("starting data bridge");

    // run() only returns on a fatal stream error. Both sockets are
    // released on drop; restarting is the supervisor's job, not ours.
    let err = bridge.run();
    error!(
        forwarded = bridge.frames_forwarded(),
        dropped = bridge.packets_dropped(),
        "bridge terminated: {err}"
    );
    ExitCode::FAILURE
}
