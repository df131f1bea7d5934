//! Configuration loaded from environment variables

use std::path::PathBuf;

/// Application configuration
///
/// Sample rate and the demodulation constants are supplied here, never
/// discovered from the capture files.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for raw IQ capture files
    pub capture_dir: PathBuf,

    /// Capture sample rate in Hz (metadata only; timing is expressed in
    /// samples below)
    pub sample_rate: u32,

    /// Power threshold separating signal from noise (on normalized
    /// samples, power = I² + Q²)
    pub power_threshold: f32,

    /// Minimum active-run length in samples for a burst candidate
    pub min_burst_samples: usize,

    /// Samples spanned by one transmitted bit
    pub samples_per_bit: usize,

    /// Report the file -> bit-strings map instead of publishing events
    pub batch_report: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            capture_dir: std::env::var("CAPTURE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("captures")),

            sample_rate: std::env::var("SAMPLE_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1_000_000),

            power_threshold: std::env::var("POWER_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(400.0),

            min_burst_samples: std::env::var("MIN_BURST_SAMPLES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(6_400),

            samples_per_bit: std::env::var("SAMPLES_PER_BIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),

            batch_report: std::env::var("BATCH_REPORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}
