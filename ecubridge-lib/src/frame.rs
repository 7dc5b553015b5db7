use crate::error::BridgeError;
use crate::packet::DecodedReading;
use crate::safety::SafetyStatus;
use bytes::Bytes;

/// Fixed identifier carried by every frame the bridge emits.
pub const FRAME_ID: u32 = 0x100;

/// Data length code; the payload is always the full 8 bytes.
pub const FRAME_DLC: u8 = 8;

/// Size of one encoded frame on the wire: id (4) + dlc (1) + data (8).
pub const WIRE_LEN: usize = 13;

/// A bus message in the emulated CAN-like format.
///
/// Not a standards-compliant CAN encoding; purely a fixed-size
/// transport envelope for a reading and its safety status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFrame {
    pub frame_id: u32,
    pub dlc: u8,
    pub data: [u8; 8],
}

impl BusFrame {
    /// Pack a validated reading and its status into a frame.
    /// Payload layout: `[volt_hi, volt_lo, temperature, status, 0, 0, 0, 0]`.
    pub fn pack(reading: &DecodedReading, status: SafetyStatus) -> Self {
        let mut data = [0u8; 8];
        data[0] = reading.volt_hi();
        data[1] = reading.volt_lo();
        data[2] = reading.temperature_c;
        data[3] = status.into();
        BusFrame {
            frame_id: FRAME_ID,
            dlc: FRAME_DLC,
            data,
        }
    }

    /// Serialize to the 13-byte wire layout, explicitly byte by byte.
    ///
    /// The frame id goes out little-endian. Field order and widths are
    /// fixed here rather than taken from native struct layout, so the
    /// wire image is identical on every platform.
    pub fn encode(&self) -> [u8; WIRE_LEN] {
        let mut wire = [0u8; WIRE_LEN];
        wire[..4].copy_from_slice(&self.frame_id.to_le_bytes());
        wire[4] = self.dlc;
        wire[5..].copy_from_slice(&self.data);
        wire
    }

    /// Status code from payload byte 3.
    pub fn status_code(&self) -> u8 {
        self.data[3]
    }
}

impl From<BusFrame> for Bytes {
    fn from(frame: BusFrame) -> Self {
        Bytes::copy_from_slice(&frame.encode())
    }
}

impl TryFrom<Bytes> for BusFrame {
    type Error = BridgeError;

    fn try_from(bytes: Bytes) -> Result<Self, Self::Error> {
        if bytes.len() != WIRE_LEN {
            return Err(BridgeError::InvalidFrame(format!(
                "expected {WIRE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let frame_id = u32::from_le_bytes(bytes[..4].try_into().map_err(|_| {
            BridgeError::InvalidFrame("frame id field truncated".to_string())
        })?);
        let dlc = bytes[4];
        let mut data = [0u8; 8];
        data.copy_from_slice(&bytes[5..]);
        Ok(BusFrame {
            frame_id,
            dlc,
            data,
        })
    }
}
