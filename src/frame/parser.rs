//! Telemetry frame parser
//!
//! Frame layout, in transmission order:
//!
//! | preamble | sync word | device id | command | battery |
//! |   24 b   |   16 b    |   20 b    |   3 b   |   1 b   |
//!
//! The parser is pure and stateless. It slices a bit string of the exact
//! frame length into fields and maps codes to semantic values; unknown
//! codes degrade to the Unknown sentinel rather than failing.

use super::types::{Battery, Command, SensorFrame};

/// Fixed synchronization prefix, discarded after burst alignment
pub const PREAMBLE_BITS: usize = 24;
/// Sync word width
pub const SYNC_BITS: usize = 16;
/// Device identifier width
pub const ID_BITS: usize = 20;
/// Command field width
pub const COMMAND_BITS: usize = 3;
/// Battery flag width
pub const BATTERY_BITS: usize = 1;

/// Total frame length; the sum of the field widths is the single
/// authority on how long a valid bit string is.
pub const FRAME_BITS: usize = PREAMBLE_BITS + SYNC_BITS + ID_BITS + COMMAND_BITS + BATTERY_BITS;

/// Expected sync word. The parser only reports the transmitted value;
/// comparing against this constant is the caller's job.
pub const SYNC_WORD: u16 = 0x2DD4;

/// Parse error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    InvalidLength,
}

/// Parse a demodulated bit string into a [`SensorFrame`].
///
/// Only a wrong length is an error; any bit pattern of the right length
/// produces a frame. Sync mismatches and unknown command codes pass
/// through for the caller to police.
pub fn parse_frame(bits: &str) -> Result<SensorFrame, ParseError> {
    if bits.len() != FRAME_BITS {
        return Err(ParseError::InvalidLength);
    }

    let mut offset = PREAMBLE_BITS; // preamble is timing alignment only, discard
    let sync_bits = &bits[offset..offset + SYNC_BITS];
    offset += SYNC_BITS;
    let id_bits = &bits[offset..offset + ID_BITS];
    offset += ID_BITS;
    let command_bits = &bits[offset..offset + COMMAND_BITS];
    offset += COMMAND_BITS;
    let battery_bits = &bits[offset..offset + BATTERY_BITS];

    Ok(SensorFrame {
        sync: bits_to_value(sync_bits) as u16,
        device_id: device_id_hex(id_bits),
        command: Command::from(bits_to_value(command_bits) as u8),
        battery: Battery::from(bits_to_value(battery_bits) as u8),
    })
}

/// Interpret a bit string as an unsigned value, MSB first.
/// Any character other than '1' counts as 0, so this never fails.
fn bits_to_value(bits: &str) -> u32 {
    bits.chars().fold(0, |acc, c| (acc << 1) | u32::from(c == '1'))
}

/// Hex-encode the device id field.
///
/// The field is left-padded with '0' to a multiple of 4 bits, grouped into
/// nibbles, and each nibble becomes one hex digit, prefixed with "0x".
fn device_id_hex(bits: &str) -> String {
    let padded_len = (bits.len() + 3) / 4 * 4;
    let padded = format!("{:0>width$}", bits, width = padded_len);

    let mut id = String::with_capacity(2 + padded_len / 4);
    id.push_str("0x");
    for nibble in padded.as_bytes().chunks(4) {
        let value = nibble
            .iter()
            .fold(0u32, |acc, &b| (acc << 1) | u32::from(b == b'1'));
        id.push(char::from_digit(value, 16).unwrap_or('0'));
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assemble a frame bit string from field values.
    fn build_bits(sync: u16, id: &str, command: &str, battery: &str) -> String {
        assert_eq!(id.len(), ID_BITS);
        assert_eq!(command.len(), COMMAND_BITS);
        assert_eq!(battery.len(), BATTERY_BITS);
        format!(
            "{}{:016b}{}{}{}",
            "10".repeat(PREAMBLE_BITS / 2),
            sync,
            id,
            command,
            battery
        )
    }

    #[test]
    fn test_frame_bits_total() {
        assert_eq!(FRAME_BITS, 64);
    }

    #[test]
    fn test_round_trip_known_fields() {
        let bits = build_bits(SYNC_WORD, "00000000000000000001", "001", "1");
        let frame = parse_frame(&bits).unwrap();
        assert_eq!(frame.sync, SYNC_WORD);
        assert!(frame.sync_valid());
        assert_eq!(frame.device_id, "0x00001");
        assert_eq!(frame.command, Command::Open);
        assert_eq!(frame.battery, Battery::Ok);
    }

    #[test]
    fn test_close_low_battery() {
        let bits = build_bits(SYNC_WORD, "10100101111000011010", "010", "0");
        let frame = parse_frame(&bits).unwrap();
        assert_eq!(frame.device_id, "0xa5e1a");
        assert_eq!(frame.command, Command::Close);
        assert_eq!(frame.battery, Battery::Low);
    }

    #[test]
    fn test_unknown_command_does_not_fail() {
        let bits = build_bits(SYNC_WORD, "00000000000000000001", "111", "1");
        let frame = parse_frame(&bits).unwrap();
        assert_eq!(frame.command, Command::Unknown);
    }

    #[test]
    fn test_sync_mismatch_still_produces_frame() {
        let bits = build_bits(0xBEEF, "00000000000000000001", "001", "1");
        let frame = parse_frame(&bits).unwrap();
        assert_eq!(frame.sync, 0xBEEF);
        assert!(!frame.sync_valid());
        assert_eq!(frame.command, Command::Open);
    }

    #[test]
    fn test_wrong_length_rejected() {
        assert_eq!(parse_frame("10101"), Err(ParseError::InvalidLength));
        assert_eq!(
            parse_frame(&"1".repeat(FRAME_BITS + 1)),
            Err(ParseError::InvalidLength)
        );
    }

    #[test]
    fn test_device_id_all_ones() {
        let bits = build_bits(SYNC_WORD, "11111111111111111111", "001", "1");
        let frame = parse_frame(&bits).unwrap();
        assert_eq!(frame.device_id, "0xfffff");
    }
}
