//! Telemetry frame parsing module

pub mod parser;
mod types;

pub use parser::{parse_frame, ParseError, FRAME_BITS, SYNC_WORD};
pub use types::{Battery, Command, SensorFrame};
