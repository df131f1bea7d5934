//! Signal power computation and burst detection
//!
//! Transmissions from the sensor show up as short bursts of energy over an
//! otherwise quiet capture. Per-sample power (I² + Q²) against a fixed
//! threshold yields an activity mask; maximal contiguous active runs of at
//! least the configured length are the burst candidates handed to the
//! demodulator.

use super::iq::NormalizedIq;

/// Inclusive sample range of one contiguous active run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Burst {
    pub start: usize,
    pub end: usize,
}

impl Burst {
    /// Number of samples spanned, inclusive of both endpoints.
    /// A burst always covers at least one sample.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Per-sample power: I² + Q². No reference normalization is applied.
pub fn compute_power(iq: &NormalizedIq) -> Vec<f32> {
    iq.i.iter()
        .zip(iq.q.iter())
        .map(|(&i, &q)| i * i + q * q)
        .collect()
}

/// Activity mask: strictly above the threshold counts as active.
/// The threshold is an externally supplied constant, never adaptive.
pub fn active_mask(power: &[f32], threshold: f32) -> Vec<bool> {
    power.iter().map(|&p| p > threshold).collect()
}

/// Find maximal contiguous active runs of at least `min_len` samples.
///
/// Single left-to-right scan: a run starts at the first active sample after
/// an inactive one (or buffer start) and ends at the sample before the next
/// inactive one (or buffer end). Any single inactive sample splits a run;
/// there is no gap tolerance. Returned bursts are disjoint and ordered by
/// start position.
pub fn find_bursts(mask: &[bool], min_len: usize) -> Vec<Burst> {
    let mut bursts = Vec::new();
    let mut run_start: Option<usize> = None;

    for (idx, &active) in mask.iter().enumerate() {
        match (active, run_start) {
            (true, None) => run_start = Some(idx),
            (false, Some(start)) => {
                let burst = Burst {
                    start,
                    end: idx - 1,
                };
                if burst.len() >= min_len {
                    bursts.push(burst);
                }
                run_start = None;
            }
            _ => {}
        }
    }

    // Run extending to buffer end
    if let Some(start) = run_start {
        let burst = Burst {
            start,
            end: mask.len() - 1,
        };
        if burst.len() >= min_len {
            bursts.push(burst);
        }
    }

    bursts
}
