//! IQ capture loading and normalization
//!
//! Capture files are raw interleaved unsigned 8-bit IQ samples (I, Q pairs),
//! the format rtl_sdr writes with no header. We de-interleave into separate
//! I and Q sequences and recenter to signed floats for the DSP stages.

use std::io;
use std::path::Path;

/// Raw unsigned IQ sample buffer, de-interleaved.
#[derive(Debug, Clone)]
pub struct IqBuffer {
    pub i: Vec<u8>,
    pub q: Vec<u8>,
}

impl IqBuffer {
    /// Split an interleaved byte buffer into I and Q sequences.
    /// Even byte offsets are I, odd are Q. An odd total byte count drops
    /// the trailing dangling byte rather than erroring.
    pub fn from_interleaved(raw: &[u8]) -> Self {
        let pairs = raw.len() / 2;
        let mut i = Vec::with_capacity(pairs);
        let mut q = Vec::with_capacity(pairs);
        for n in 0..pairs {
            i.push(raw[n * 2]);
            q.push(raw[n * 2 + 1]);
        }
        Self { i, q }
    }

    /// Number of complex samples.
    pub fn len(&self) -> usize {
        self.i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }

    /// Recenter unsigned samples to signed floats.
    ///
    /// Uses a fixed −128 offset, not the true unsigned midpoint of 127.5.
    /// The ~0.5-unit bias is intentional and matches the sensor decoder
    /// this implementation interoperates with; do not "correct" it.
    pub fn normalize(&self) -> NormalizedIq {
        let i = self.i.iter().map(|&v| f32::from(v) - 128.0).collect();
        let q = self.q.iter().map(|&v| f32::from(v) - 128.0).collect();
        NormalizedIq { i, q }
    }
}

/// Signed floating-point IQ samples, centered around zero.
#[derive(Debug, Clone)]
pub struct NormalizedIq {
    pub i: Vec<f32>,
    pub q: Vec<f32>,
}

impl NormalizedIq {
    pub fn len(&self) -> usize {
        self.i.len()
    }

    pub fn is_empty(&self) -> bool {
        self.i.is_empty()
    }
}

/// Read a capture file into an [`IqBuffer`].
/// A missing or unreadable file is fatal for that file only; the caller
/// decides whether to continue the batch.
pub fn read_capture(path: &Path) -> io::Result<IqBuffer> {
    let raw = std::fs::read(path)?;
    Ok(IqBuffer::from_interleaved(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deinterleave_even() {
        let buf = IqBuffer::from_interleaved(&[10, 20, 30, 40, 50, 60]);
        assert_eq!(buf.i, vec![10, 30, 50]);
        assert_eq!(buf.q, vec![20, 40, 60]);
        assert_eq!(buf.len(), 3);
    }

    #[test]
    fn test_deinterleave_odd_drops_trailing_byte() {
        let buf = IqBuffer::from_interleaved(&[1, 2, 3, 4, 5]);
        assert_eq!(buf.i, vec![1, 3]);
        assert_eq!(buf.q, vec![2, 4]);
    }

    #[test]
    fn test_deinterleave_empty() {
        let buf = IqBuffer::from_interleaved(&[]);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_normalize_offset() {
        let buf = IqBuffer {
            i: vec![0, 128, 255],
            q: vec![128, 128, 128],
        };
        let norm = buf.normalize();
        assert_eq!(norm.i, vec![-128.0, 0.0, 127.0]);
        assert_eq!(norm.q, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_read_capture_missing_file() {
        let result = read_capture(Path::new("/nonexistent/capture.cu8"));
        assert!(result.is_err());
    }
}
