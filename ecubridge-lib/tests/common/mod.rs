//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use ecubridge_lib::Bridge;
#[allow(unused_imports)]
pub use ecubridge_lib::error::{BridgeError, DiscardReason};
#[allow(unused_imports)]
pub use ecubridge_lib::frame::{BusFrame, FRAME_DLC, FRAME_ID, WIRE_LEN};
#[allow(unused_imports)]
pub use ecubridge_lib::packet::{DecodedReading, PACKET_LEN, RawPacket, SYNC_BYTE};
#[allow(unused_imports)]
pub use ecubridge_lib::safety::{CRIT_TEMP_C, LOW_VOLT_MV, SafetyStatus, classify};
#[allow(unused_imports)]
pub use ecubridge_lib::transport::{Delay, FrameSink, SensorStream};

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Vec<u8> {
    hex::decode(hex_data).expect("Failed to decode hex")
}

/// Known-good packet: 3300 mV, 45 °C, checksum 0xE7.
#[allow(dead_code)]
pub const SCENARIO_PACKET: [u8; PACKET_LEN] = [0xAA, 0x0C, 0xE4, 0x2D, 0xE7];

/// Expected payload for [`SCENARIO_PACKET`] with status OK.
#[allow(dead_code)]
pub const SCENARIO_PAYLOAD: [u8; 8] = [0x0C, 0xE4, 0x2D, 0x00, 0, 0, 0, 0];

/// Scripted stream: each `read` hands out the next chunk, so tests can
/// exercise partial deliveries. An exhausted script reads as EOF.
pub struct ScriptedStream {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedStream {
    #[allow(dead_code)]
    pub fn new<I, C>(chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Vec<u8>>,
    {
        ScriptedStream {
            chunks: chunks.into_iter().map(Into::into).collect(),
        }
    }
}

impl SensorStream for ScriptedStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            self.chunks.push_front(chunk.split_off(n));
        }
        Ok(n)
    }
}

/// Sink that records every datagram, optionally failing each send.
/// Cloneable so tests keep a handle after the bridge takes ownership.
#[derive(Clone, Default)]
pub struct CapturingSink {
    inner: Arc<Mutex<CapturingSinkInner>>,
}

#[derive(Default)]
struct CapturingSinkInner {
    datagrams: Vec<Vec<u8>>,
    fail: bool,
}

impl CapturingSink {
    #[allow(dead_code)]
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        let sink = Self::default();
        sink.inner.lock().unwrap().fail = true;
        sink
    }

    #[allow(dead_code)]
    pub fn datagrams(&self) -> Vec<Vec<u8>> {
        self.inner.lock().unwrap().datagrams.clone()
    }
}

impl FrameSink for CapturingSink {
    fn send(&mut self, datagram: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail {
            return Err(io::Error::other("bus unreachable"));
        }
        inner.datagrams.push(datagram.to_vec());
        Ok(datagram.len())
    }
}

/// Delay that only counts invocations; no real time passes.
#[derive(Default)]
pub struct CountingDelay {
    pub waits: u32,
}

impl Delay for CountingDelay {
    fn wait(&mut self, _interval: Duration) {
        self.waits += 1;
    }
}
