//! Per-file decode pipeline
//!
//! Ties the demodulation stages together for one capture file: load,
//! normalize, demodulate bursts into unique bit strings, and parse the
//! exact-length strings into frames. The pipeline is synchronous and
//! referentially transparent; every call builds independent buffers, so
//! files can safely be decoded in parallel by the orchestration layer.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::frame::{parse_frame, SensorFrame};
use crate::sdr::{read_capture, BurstDecoder};

/// Decode failure for a single capture file
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read capture {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of decoding one capture file
#[derive(Debug, Clone)]
pub struct DecodedFile {
    /// File stem used as the batch-report key
    pub file_id: String,

    /// Unique frame-length bit strings, first-seen order
    pub bitstrings: Vec<String>,

    /// Every parsed frame, sync mismatches included. Dropping mismatches
    /// is the caller's policy, not the pipeline's.
    pub frames: Vec<SensorFrame>,
}

/// Decoder for capture files with fixed tuning constants
///
/// Sample rate, threshold, and symbol timing are externally supplied;
/// nothing is discovered from the file itself.
#[derive(Debug, Clone, Copy)]
pub struct FileDecoder {
    pub power_threshold: f32,
    pub min_burst_samples: usize,
    pub samples_per_bit: usize,
}

impl FileDecoder {
    pub fn new(power_threshold: f32, min_burst_samples: usize, samples_per_bit: usize) -> Self {
        Self {
            power_threshold,
            min_burst_samples,
            samples_per_bit,
        }
    }

    /// Run the full pipeline over one capture file.
    ///
    /// A capture with no qualifying bursts decodes to an empty result,
    /// not an error; only an unreadable file fails.
    pub fn decode_file(&self, path: &Path) -> Result<DecodedFile, DecodeError> {
        let file_id = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());

        let iq = read_capture(path).map_err(|source| DecodeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("{}: {} IQ samples loaded", file_id, iq.len());

        let normalized = iq.normalize();
        let mut decoder = BurstDecoder::new(
            self.power_threshold,
            self.min_burst_samples,
            self.samples_per_bit,
        );
        let bitstrings = decoder.process(&normalized);

        // Every bit string surviving the length gate parses; the only
        // parser error is a length mismatch, which the gate rules out.
        let frames = bitstrings
            .iter()
            .filter_map(|bits| parse_frame(bits).ok())
            .collect::<Vec<_>>();

        info!(
            "{}: {} bursts, {} unique frames",
            file_id,
            decoder.stats.bursts_detected,
            frames.len()
        );

        Ok(DecodedFile {
            file_id,
            bitstrings,
            frames,
        })
    }

    /// Batch mode: map each file to its unique bit strings.
    ///
    /// An unreadable file fails that entry only; the rest of the batch
    /// still decodes. Failures are logged and omitted from the map.
    pub fn decode_batch(&self, paths: &[PathBuf]) -> HashMap<String, Vec<String>> {
        let mut report = HashMap::with_capacity(paths.len());
        for path in paths {
            match self.decode_file(path) {
                Ok(decoded) => {
                    report.insert(decoded.file_id, decoded.bitstrings);
                }
                Err(e) => {
                    tracing::warn!("Skipping capture: {:#}", e);
                }
            }
        }
        report
    }
}
