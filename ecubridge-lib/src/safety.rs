use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum_macros::Display;

/// Temperatures strictly above this are critical, whatever the voltage.
pub const CRIT_TEMP_C: u8 = 60;

/// Voltages strictly below this raise a low-voltage warning.
pub const LOW_VOLT_MV: u16 = 3100;

/// Safety classification carried in byte 3 of the frame payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Default, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SafetyStatus {
    #[default]
    #[strum(to_string = "OK")]
    Ok = 0x00,
    #[strum(to_string = "WARN_LOW_VOLT")]
    WarnLowVolt = 0x01,
    #[strum(to_string = "CRIT_TEMP")]
    CritTemp = 0x02,
}

/// Classify one reading.
///
/// Pure and memoryless: a critical temperature always wins over a
/// low-voltage warning, and no state is carried between readings.
pub fn classify(voltage_mv: u16, temperature_c: u8) -> SafetyStatus {
    if temperature_c > CRIT_TEMP_C {
        SafetyStatus::CritTemp
    } else if voltage_mv < LOW_VOLT_MV {
        SafetyStatus::WarnLowVolt
    } else {
        SafetyStatus::Ok
    }
}
