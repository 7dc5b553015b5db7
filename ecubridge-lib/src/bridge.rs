use crate::error::BridgeError;
use crate::frame::BusFrame;
use crate::packet::{PACKET_LEN, RawPacket};
use crate::safety::classify;
use crate::transport::{FrameSink, SensorStream};
use tracing::{info, warn};

/// Lifecycle state of the sensor link.
///
/// `Connecting → Streaming` happens in the transport layer before a
/// `Bridge` exists; a constructed bridge starts in `Streaming`. A
/// validation failure self-loops in `Streaming` (packet dropped); any
/// read failure moves to `Terminated`, which is final. There is no
/// reconnect after an established session drops — the process is meant
/// to be restarted externally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Connecting,
    Streaming,
    Terminated,
}

/// The bridge pipeline: read one packet, validate, classify, pack,
/// broadcast. Strictly serial; packet n is fully handled before packet
/// n+1 is read, so frames go out in arrival order of valid packets.
pub struct Bridge<S, K> {
    stream: S,
    sink: K,
    state: LinkState,
    forwarded: u64,
    dropped: u64,
}

impl<S: SensorStream, K: FrameSink> Bridge<S, K> {
    pub fn new(stream: S, sink: K) -> Self {
        Bridge {
            stream,
            sink,
            state: LinkState::Streaming,
            forwarded: 0,
            dropped: 0,
        }
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Frames handed to the sink so far.
    pub fn frames_forwarded(&self) -> u64 {
        self.forwarded
    }

    /// Packets discarded for bad sync or bad checksum.
    pub fn packets_dropped(&self) -> u64 {
        self.dropped
    }

    /// Assemble exactly one packet, tolerating partial deliveries.
    fn read_packet(&mut self) -> Result<RawPacket, BridgeError> {
        let mut buf = [0u8; PACKET_LEN];
        let mut filled = 0;
        while filled < PACKET_LEN {
            match self.stream.read(&mut buf[filled..]) {
                Ok(0) => return Err(BridgeError::StreamClosed),
                Ok(n) => filled += n,
                Err(e) => return Err(BridgeError::Stream(e)),
            }
        }
        Ok(RawPacket::from(buf))
    }

    /// Run one pipeline iteration. Returns `Ok(true)` if a frame was
    /// emitted, `Ok(false)` if the packet was dropped, and `Err` only
    /// on stream termination, which is fatal.
    ///
    /// On a dropped packet the reader resumes at the next 5-byte
    /// boundary; there is no scan forward for the next sync byte, so a
    /// single inserted or lost byte upstream can misframe subsequent
    /// packets until alignment coincidentally recurs.
    pub fn step(&mut self) -> Result<bool, BridgeError> {
        let packet = match self.read_packet() {
            Ok(packet) => packet,
            Err(e) => {
                self.state = LinkState::Terminated;
                return Err(e);
            }
        };

        let reading = match packet.decode() {
            Ok(reading) => reading,
            Err(reason) => {
                self.dropped += 1;
                warn!(%reason, "dropping packet");
                return Ok(false);
            }
        };

        let status = classify(reading.voltage_mv, reading.temperature_c);
        let frame = BusFrame::pack(&reading, status);

        // Best-effort fan-out; a failed send never stops the loop.
        if let Err(e) = self.sink.send(&frame.encode()) {
            warn!("bus send failed: {e}");
        }
        self.forwarded += 1;

        info!(
            voltage_mv = reading.voltage_mv,
            temperature_c = reading.temperature_c,
            status = %status,
            "forwarded reading"
        );
        Ok(true)
    }

    /// Drive the pipeline until the stream terminates. The loop is
    /// unbounded in normal operation; the return value is the fatal
    /// error that ended it.
    pub fn run(&mut self) -> BridgeError {
        loop {
            if let Err(e) = self.step() {
                return e;
            }
        }
    }
}
