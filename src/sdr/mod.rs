//! IQ capture demodulation pipeline
//!
//! This module turns a raw capture file into candidate bit strings:
//! 1. Load interleaved unsigned 8-bit IQ samples from file
//! 2. Recenter to signed floats (value − 128)
//! 3. Compute per-sample power (I² + Q²) and threshold into an activity mask
//! 4. Extract contiguous active bursts meeting the minimum length
//! 5. Differential-phase demodulate each burst (atan2 + wrapped deltas)
//! 6. Integrate-and-dump into bit strings, deduplicated per file

pub mod demod;
pub mod iq;
pub mod power;

pub use demod::{BurstDecoder, DecoderStats};
pub use iq::{read_capture, IqBuffer, NormalizedIq};
pub use power::Burst;
