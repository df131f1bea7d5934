//! Sensor frame data types

use serde::Serialize;

/// Command carried by a sensor transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Command {
    Open,
    Close,
    Unknown,
}

impl From<u8> for Command {
    fn from(code: u8) -> Self {
        match code {
            0b001 => Self::Open,
            0b010 => Self::Close,
            _ => Self::Unknown,
        }
    }
}

/// Battery status flag
///
/// The field is a single bit, so Unknown is unreachable from the wire;
/// the arm exists so the lookup stays total if the width ever changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Battery {
    Ok,
    Low,
    Unknown,
}

impl From<u8> for Battery {
    fn from(code: u8) -> Self {
        match code {
            1 => Self::Ok,
            0 => Self::Low,
            _ => Self::Unknown,
        }
    }
}

/// Parsed telemetry frame
///
/// The parser fills every field for any input of the right length; a sync
/// mismatch is reported through `sync`, never by refusing to parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorFrame {
    /// Sync word as transmitted (16 bits)
    pub sync: u16,

    /// Device identifier, hex string with "0x" prefix (20 id bits)
    pub device_id: String,

    /// Decoded command
    pub command: Command,

    /// Decoded battery status
    pub battery: Battery,
}

impl SensorFrame {
    /// Whether the sync word matches the protocol constant.
    /// Frames failing this check are dropped by the caller, not here.
    pub fn sync_valid(&self) -> bool {
        self.sync == super::parser::SYNC_WORD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_lookup_closed() {
        assert_eq!(Command::from(0b001), Command::Open);
        assert_eq!(Command::from(0b010), Command::Close);
        assert_eq!(Command::from(0b111), Command::Unknown);
        assert_eq!(Command::from(0b000), Command::Unknown);
    }

    #[test]
    fn test_battery_lookup() {
        assert_eq!(Battery::from(1), Battery::Ok);
        assert_eq!(Battery::from(0), Battery::Low);
        assert_eq!(Battery::from(2), Battery::Unknown);
    }
}
