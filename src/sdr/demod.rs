//! Differential-phase demodulation and bit slicing
//!
//! The sensor keys its bits onto the direction of phase rotation, so
//! demodulation is: per-sample phase via atan2, wrapped phase differences,
//! then integrate-and-dump over fixed-width symbol periods inside each
//! detected burst. The sign of the integrated difference decides the bit.

use std::f32::consts::PI;

use tracing::{debug, trace};

use super::iq::NormalizedIq;
use super::power::{active_mask, compute_power, find_bursts, Burst};
use crate::frame::parser::FRAME_BITS;

/// Per-sample phase in radians, atan2(Q, I), over the whole capture.
pub fn compute_phase(iq: &NormalizedIq) -> Vec<f32> {
    iq.q.iter()
        .zip(iq.i.iter())
        .map(|(&q, &i)| q.atan2(i))
        .collect()
}

/// Wrapped differences between consecutive phases.
///
/// Each delta gets at most one ±2π correction into (−π, π]; consecutive
/// phase change is assumed never to exceed 2π in magnitude, so no
/// multi-wrap handling. The first element is defined as 0.
pub fn phase_diff(phase: &[f32]) -> Vec<f32> {
    let mut diff = Vec::with_capacity(phase.len());
    if phase.is_empty() {
        return diff;
    }
    diff.push(0.0);
    for w in phase.windows(2) {
        let mut d = w[1] - w[0];
        if d > PI {
            d -= 2.0 * PI;
        } else if d <= -PI {
            d += 2.0 * PI;
        }
        diff.push(d);
    }
    diff
}

/// Integrate-and-dump one burst into a bit string.
///
/// Symbol count is floor(burst length / samples_per_bit); trailing
/// remainder samples are discarded, never zero-padded. A symbol sums the
/// phase differences over its window; the bit is '1' only for a strictly
/// positive sum (a zero sum resolves to '0').
pub fn slice_bits(diff: &[f32], burst: Burst, samples_per_bit: usize) -> String {
    let num_bits = burst.len() / samples_per_bit;
    let mut bits = String::with_capacity(num_bits);

    for bit_idx in 0..num_bits {
        let window_start = burst.start + bit_idx * samples_per_bit;
        let sum: f32 = diff[window_start..window_start + samples_per_bit]
            .iter()
            .sum();
        bits.push(if sum > 0.0 { '1' } else { '0' });
    }

    bits
}

/// Statistics for one decoder pass
#[derive(Debug, Default)]
pub struct DecoderStats {
    pub samples_processed: u64,
    pub bursts_detected: u64,
    pub bitstrings_decoded: u64,
    pub length_rejects: u64,
    pub duplicates: u64,
}

/// Burst decoder - runs the power/phase pipeline over one capture
///
/// Tuning constants are supplied by the caller and fixed for the life of
/// the decoder; nothing here adapts to signal conditions.
pub struct BurstDecoder {
    power_threshold: f32,
    min_burst_samples: usize,
    samples_per_bit: usize,
    pub stats: DecoderStats,
}

impl BurstDecoder {
    pub fn new(power_threshold: f32, min_burst_samples: usize, samples_per_bit: usize) -> Self {
        Self {
            power_threshold,
            min_burst_samples,
            samples_per_bit,
            stats: DecoderStats::default(),
        }
    }

    /// Demodulate every qualifying burst in the capture and return the
    /// deduplicated bit strings of exact frame length, in first-seen order.
    ///
    /// Bit strings of any other length are noise or partial captures and
    /// are dropped silently. A capture with no bursts returns an empty
    /// vector, not an error.
    pub fn process(&mut self, iq: &NormalizedIq) -> Vec<String> {
        self.stats.samples_processed += iq.len() as u64;

        let power = compute_power(iq);
        let mask = active_mask(&power, self.power_threshold);
        let bursts = find_bursts(&mask, self.min_burst_samples);
        self.stats.bursts_detected += bursts.len() as u64;

        if bursts.is_empty() {
            return Vec::new();
        }

        // Phase pipeline is computed once over the full capture; bursts
        // index into the shared difference buffer.
        let phase = compute_phase(iq);
        let diff = phase_diff(&phase);

        let mut unique = Vec::new();
        let mut seen = std::collections::HashSet::new();

        for burst in bursts {
            let bits = slice_bits(&diff, burst, self.samples_per_bit);
            trace!(
                "Burst [{}, {}]: {} samples -> {} bits",
                burst.start,
                burst.end,
                burst.len(),
                bits.len()
            );

            if bits.len() != FRAME_BITS {
                self.stats.length_rejects += 1;
                continue;
            }
            self.stats.bitstrings_decoded += 1;

            if seen.insert(bits.clone()) {
                unique.push(bits);
            } else {
                self.stats.duplicates += 1;
            }
        }

        debug!(
            "Capture decoded: {} bursts, {} unique frames, {} length rejects, {} duplicates",
            self.stats.bursts_detected,
            unique.len(),
            self.stats.length_rejects,
            self.stats.duplicates
        );

        unique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_diff_first_element_zero() {
        let diff = phase_diff(&[1.0, 1.5, 2.0]);
        assert_eq!(diff[0], 0.0);
        assert_eq!(diff.len(), 3);
    }

    #[test]
    fn test_phase_diff_wraps_positive_jump() {
        // 3.0 -> -3.0 crosses the pi boundary; true advance is ~ +0.28
        let diff = phase_diff(&[3.0, -3.0]);
        assert!((diff[1] - (2.0 * PI - 6.0)).abs() < 1e-5);
    }

    #[test]
    fn test_phase_diff_wraps_negative_jump() {
        let diff = phase_diff(&[-3.0, 3.0]);
        assert!((diff[1] + (2.0 * PI - 6.0)).abs() < 1e-5);
    }

    #[test]
    fn test_phase_diff_always_in_range() {
        let phases = [-PI, -2.0, -0.5, 0.0, 0.5, 2.0, PI, -PI, PI];
        let diff = phase_diff(&phases);
        for &d in &diff {
            assert!(d > -PI - 1e-6 && d <= PI + 1e-6, "out of range: {}", d);
        }
    }

    #[test]
    fn test_slice_bits_signs() {
        // 4 samples per bit: one positive symbol, one negative symbol
        let diff = vec![0.5, 0.5, 0.5, 0.5, -0.5, -0.5, -0.5, -0.5];
        let burst = Burst { start: 0, end: 7 };
        assert_eq!(slice_bits(&diff, burst, 4), "10");
    }

    #[test]
    fn test_slice_bits_discards_remainder() {
        let diff = vec![0.5; 10];
        let burst = Burst { start: 0, end: 9 };
        // floor(10 / 4) = 2 bits, 2 trailing samples dropped
        assert_eq!(slice_bits(&diff, burst, 4), "11");
    }

    #[test]
    fn test_slice_bits_zero_sum_is_zero_bit() {
        let diff = vec![0.5, -0.5, 0.0, 0.0];
        let burst = Burst { start: 0, end: 3 };
        assert_eq!(slice_bits(&diff, burst, 4), "0");
    }

    #[test]
    fn test_slice_bits_deterministic() {
        let diff: Vec<f32> = (0..64)
            .map(|n| if n % 3 == 0 { -0.4 } else { 0.3 })
            .collect();
        let burst = Burst { start: 0, end: 63 };
        let a = slice_bits(&diff, burst, 8);
        let b = slice_bits(&diff, burst, 8);
        assert_eq!(a, b);
        assert_eq!(a.len(), 8);
    }

    #[test]
    fn test_process_quiet_capture_yields_nothing() {
        let iq = NormalizedIq {
            i: vec![0.0; 1000],
            q: vec![0.0; 1000],
        };
        let mut decoder = BurstDecoder::new(400.0, 100, 10);
        assert!(decoder.process(&iq).is_empty());
        assert_eq!(decoder.stats.bursts_detected, 0);
    }
}
