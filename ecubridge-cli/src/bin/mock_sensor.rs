//! Simulated battery sensor: serves the 5-byte packet stream the bridge
//! expects over TCP, with a simple degradation model so downstream
//! observers see realistic data. Normal operation is a sawtooth voltage
//! ramp; noise grows with age, voltage sags after long operation, and
//! occasional hard faults appear once a warm-up period has passed.

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use ecubridge_lib::packet::RawPacket;
use rand::rngs::ThreadRng;
use rand::Rng;
use std::io::Write;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "Simulated battery sensor for the ecubridge gateway")]
struct Args {
    /// Address to listen on for the gateway
    #[arg(long, env = "ECUBRIDGE_SENSOR_LISTEN", default_value = "0.0.0.0:4000")]
    listen: SocketAddr,

    /// Packets per second
    #[arg(long, default_value_t = 10.0)]
    rate_hz: f64,

    /// Reported temperature in degrees Celsius
    #[arg(long, default_value_t = 45)]
    temperature: u8,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

/// All simulation state lives here, owned by the sensor alone.
struct SensorModel {
    voltage_mv: u16,
    temperature_c: u8,
    noise_amplitude: f32,
    packets_sent: u64,
    rng: ThreadRng,
}

impl SensorModel {
    fn new(temperature_c: u8) -> Self {
        SensorModel {
            voltage_mv: 3300,
            temperature_c,
            noise_amplitude: 2.0,
            packets_sent: 0,
            rng: rand::thread_rng(),
        }
    }

    fn next_packet(&mut self) -> RawPacket {
        self.packets_sent += 1;

        // Normal behavior: sawtooth ramp between 3000 and 4000 mV.
        self.voltage_mv += 10;
        if self.voltage_mv > 4000 {
            self.voltage_mv = 3000;
        }

        // Aging: noise amplitude creeps up over time.
        if self.packets_sent % 100 == 0 {
            self.noise_amplitude += 0.5;
        }
        let amp = self.noise_amplitude as i32;
        let noise = self.rng.gen_range(-amp..=amp);
        let mut voltage = (i32::from(self.voltage_mv) + noise).clamp(0, i32::from(u16::MAX)) as u16;

        // Capacity loss: slow sag after long operation.
        if self.packets_sent > 600 && voltage > 200 {
            voltage -= 1;
        }

        // Hard fault injection, only after observers have seen enough
        // clean data to learn a baseline.
        if self.packets_sent > 300 && self.rng.gen_range(1..=100) <= 2 {
            warn!(seq = self.packets_sent, "injecting battery failure");
            voltage = 100;
        }

        RawPacket::from_reading(voltage, self.temperature_c)
    }
}

fn stream_packets(
    stream: &mut TcpStream,
    model: &mut SensorModel,
    period: Duration,
) -> std::io::Result<()> {
    loop {
        let packet = model.next_packet();
        stream.write_all(packet.as_bytes())?;
        info!(
            seq = model.packets_sent,
            voltage_mv = u16::from_be_bytes([packet.volt_hi(), packet.volt_lo()]),
            temperature_c = packet.temperature(),
            noise_amplitude = model.noise_amplitude,
            "tx"
        );
        std::thread::sleep(period);
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbosity.tracing_level_filter())
        .init();

    anyhow::ensure!(args.rate_hz > 0.0, "rate must be positive");
    let period = Duration::from_secs_f64(1.0 / args.rate_hz);

    let listener = TcpListener::bind(args.listen)
        .with_context(|| format!("failed to bind {}", args.listen))?;
    info!("simulated sensor listening on tcp {}", args.listen);

    // Model state survives gateway reconnects so aging keeps advancing.
    let mut model = SensorModel::new(args.temperature);

    loop {
        info!("waiting for gateway connection");
        let (mut stream, peer) = listener.accept().context("accept failed")?;
        info!("gateway connected from {peer}, starting data stream");
        if let Err(e) = stream_packets(&mut stream, &mut model, period) {
            warn!("gateway disconnected: {e}");
        }
    }
}
