use crate::error::DiscardReason;
use std::fmt;

/// Leading marker identifying the start of a sensor packet.
pub const SYNC_BYTE: u8 = 0xAA;

/// Size of one sensor packet on the wire.
pub const PACKET_LEN: usize = 5;

/// One 5-byte sensor packet exactly as received:
/// `[sync, volt_hi, volt_lo, temperature, checksum]`.
///
/// Ephemeral; lives only within one bridge loop iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPacket([u8; PACKET_LEN]);

impl RawPacket {
    pub fn sync(&self) -> u8 {
        self.0[0]
    }

    pub fn volt_hi(&self) -> u8 {
        self.0[1]
    }

    pub fn volt_lo(&self) -> u8 {
        self.0[2]
    }

    pub fn temperature(&self) -> u8 {
        self.0[3]
    }

    pub fn received_checksum(&self) -> u8 {
        self.0[4]
    }

    /// Additive modulo-256 checksum over the non-checksum bytes,
    /// sync byte included.
    pub fn computed_checksum(&self) -> u8 {
        self.0[..PACKET_LEN - 1]
            .iter()
            .fold(0u8, |sum, b| sum.wrapping_add(*b))
    }

    /// Validate sync marker and checksum, then decode the reading.
    ///
    /// Sync is checked first, so a packet with both a bad marker and a
    /// bad checksum reports [`DiscardReason::BadSync`].
    pub fn decode(&self) -> Result<DecodedReading, DiscardReason> {
        if self.sync() != SYNC_BYTE {
            return Err(DiscardReason::BadSync { found: self.sync() });
        }
        let computed = self.computed_checksum();
        let received = self.received_checksum();
        if computed != received {
            return Err(DiscardReason::BadChecksum { computed, received });
        }
        Ok(DecodedReading {
            voltage_mv: u16::from_be_bytes([self.volt_hi(), self.volt_lo()]),
            temperature_c: self.temperature(),
        })
    }

    /// Build a well-formed packet for a reading, checksum included.
    /// This is the encoder side of the sensor protocol, used by the
    /// sensor simulator and by tests.
    pub fn from_reading(voltage_mv: u16, temperature_c: u8) -> Self {
        let [volt_hi, volt_lo] = voltage_mv.to_be_bytes();
        let checksum = SYNC_BYTE
            .wrapping_add(volt_hi)
            .wrapping_add(volt_lo)
            .wrapping_add(temperature_c);
        RawPacket([SYNC_BYTE, volt_hi, volt_lo, temperature_c, checksum])
    }

    pub fn as_bytes(&self) -> &[u8; PACKET_LEN] {
        &self.0
    }
}

impl From<[u8; PACKET_LEN]> for RawPacket {
    fn from(bytes: [u8; PACKET_LEN]) -> Self {
        RawPacket(bytes)
    }
}

/// A validated sensor reading. Derived per packet, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedReading {
    /// Battery voltage in millivolts, big-endian composition of the
    /// two voltage bytes.
    pub voltage_mv: u16,
    /// Temperature in whole degrees Celsius.
    pub temperature_c: u8,
}

impl DecodedReading {
    pub fn volt_hi(&self) -> u8 {
        (self.voltage_mv >> 8) as u8
    }

    pub fn volt_lo(&self) -> u8 {
        (self.voltage_mv & 0xFF) as u8
    }
}

impl fmt::Display for DecodedReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} mV, {} °C", self.voltage_mv, self.temperature_c)
    }
}
