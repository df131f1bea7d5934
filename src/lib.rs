//! Sub-GHz sensor capture decoder
//!
//! Recovers telemetry frames from raw IQ capture files: bursts of energy
//! are located by power thresholding, demodulated with differential-phase
//! detection, and bit strings of the exact protocol length are parsed into
//! {sync, device id, command, battery} frames. Orchestration (ingestion
//! queue, discovery cache, publish sink) lives alongside the pipeline; the
//! pipeline itself is pure and per-file deterministic.

pub mod config;
pub mod discovery;
pub mod frame;
pub mod ingest;
pub mod pipeline;
pub mod publish;
pub mod sdr;

pub use frame::{parse_frame, Battery, Command, SensorFrame, FRAME_BITS, SYNC_WORD};
pub use pipeline::{DecodeError, DecodedFile, FileDecoder};
