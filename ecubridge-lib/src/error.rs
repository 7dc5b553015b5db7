use std::io;
use thiserror::Error;

/// The primary error type for the `ecubridge` library.
///
/// Every variant here is fatal to the bridge process. Per-packet
/// validation failures are not errors in this sense; they are
/// represented by [`DiscardReason`] and the packet is simply dropped.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("socket setup failed: {0}")]
    Setup(#[source] io::Error),

    #[error("sensor stream closed by peer")]
    StreamClosed,

    #[error("sensor stream error: {0}")]
    Stream(#[source] io::Error),

    #[error("invalid bus frame: {0}")]
    InvalidFrame(String),
}

/// Why an inbound packet was dropped instead of forwarded.
///
/// A dropped packet never produces a frame; the reader resumes at the
/// next 5-byte boundary without scanning for the next sync byte.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardReason {
    #[error("sync byte error: got {found:#04x}, expected 0xaa")]
    BadSync { found: u8 },

    #[error("checksum mismatch: computed {computed:#04x}, received {received:#04x}")]
    BadChecksum { computed: u8, received: u8 },
}
