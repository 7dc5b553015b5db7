use crate::error::BridgeError;
use std::io::{self, Read};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, UdpSocket};
use std::time::Duration;
use tracing::{info, warn};

/// Fixed delay between connection attempts while waiting for the sensor.
pub const CONNECT_RETRY_INTERVAL: Duration = Duration::from_secs(2);

/// Blocking byte source carrying sensor packets.
///
/// A single read may return any number of bytes from 1 up to the buffer
/// size; `Ok(0)` means the peer closed the stream.
pub trait SensorStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Best-effort datagram sink for encoded frames. One call, one datagram.
pub trait FrameSink {
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize>;
}

/// Delay strategy between connect attempts. Injectable so tests can
/// drive the retry loop without real time passing.
pub trait Delay {
    fn wait(&mut self, interval: Duration);
}

/// Production delay: blocks the bridge thread.
pub struct ThreadSleep;

impl Delay for ThreadSleep {
    fn wait(&mut self, interval: Duration) {
        std::thread::sleep(interval);
    }
}

/// TCP connection to the sensor.
pub struct TcpSensorStream {
    stream: TcpStream,
}

impl SensorStream for TcpSensorStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

/// UDP fan-out to a fixed destination. Fire-and-forget: no
/// acknowledgment, no retry, no backpressure.
pub struct UdpBroadcaster {
    socket: UdpSocket,
    dest: SocketAddr,
}

impl UdpBroadcaster {
    /// Bind an ephemeral local port for sending to `dest`.
    pub fn new(dest: SocketAddr) -> Result<Self, BridgeError> {
        let bind_addr: SocketAddr = if dest.is_ipv6() {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr).map_err(BridgeError::Setup)?;
        Ok(UdpBroadcaster { socket, dest })
    }

    pub fn destination(&self) -> SocketAddr {
        self.dest
    }
}

impl FrameSink for UdpBroadcaster {
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize> {
        self.socket.send_to(datagram, self.dest)
    }
}

/// Retry `attempt` until it succeeds, waiting `interval` between
/// failures. This phase never fails permanently; a sensor that is not
/// up yet is an expected transient condition, not an error.
pub fn connect_retrying<T, F, D>(mut attempt: F, interval: Duration, delay: &mut D) -> T
where
    F: FnMut() -> io::Result<T>,
    D: Delay,
{
    loop {
        match attempt() {
            Ok(conn) => return conn,
            Err(e) => {
                warn!("connect attempt failed: {e}; retrying in {interval:?}");
                delay.wait(interval);
            }
        }
    }
}

/// Connect to the sensor, retrying until it becomes available.
pub fn connect_sensor<D: Delay>(
    addr: SocketAddr,
    interval: Duration,
    delay: &mut D,
) -> TcpSensorStream {
    info!("connecting to sensor at {addr}");
    let stream = connect_retrying(|| TcpStream::connect(addr), interval, delay);
    info!("sensor connected");
    TcpSensorStream { stream }
}
