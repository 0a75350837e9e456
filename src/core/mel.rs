// src/core/mel.rs
//
// Triangular mel filter bank over a linear frequency axis.

use serde::{Deserialize, Serialize};

use crate::error::{MfccError, Result};

/// Closed frequency interval in Hz
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyRange {
    pub lower: f32,
    pub upper: f32,
}

impl FrequencyRange {
    pub const fn new(lower: f32, upper: f32) -> Self {
        Self { lower, upper }
    }

    pub fn width(&self) -> f32 {
        self.upper - self.lower
    }

    pub fn contains_range(&self, other: &FrequencyRange) -> bool {
        other.lower >= self.lower && other.upper <= self.upper
    }
}

impl std::fmt::Display for FrequencyRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{} Hz", self.lower, self.upper)
    }
}

/// Hz to mel, `1125 ln(1 + f/700)`
#[inline]
pub fn hz_to_mel(hz: f32) -> f32 {
    1125.0 * (1.0 + hz / 700.0).ln()
}

/// Mel to Hz, `700 (e^(m/1125) - 1)`
#[inline]
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * ((mel / 1125.0).exp() - 1.0)
}

/// Dense `num_filters × num_bins` matrix of triangular band-pass weights.
///
/// Band edges are spaced uniformly on the mel scale across the target range;
/// bins sample the source range linearly. Immutable after `build`, so one
/// bank can be shared by any number of frame processors.
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    source_range: FrequencyRange,
    target_range: FrequencyRange,
    num_bins: usize,
    num_filters: usize,
    /// `num_filters + 2` band edges in Hz
    edges: Vec<f32>,
    /// Row-major weights, one row per filter
    weights: Vec<f32>,
    degenerate: Vec<usize>,
}

impl MelFilterBank {
    pub fn build(
        source_range: FrequencyRange,
        target_range: FrequencyRange,
        num_bins: usize,
        num_filters: usize,
    ) -> Result<Self> {
        validate(&source_range, &target_range, num_bins, num_filters)?;

        let mel_low = hz_to_mel(target_range.lower);
        let mel_high = hz_to_mel(target_range.upper);
        let intervals = (num_filters + 1) as f32;
        let edges: Vec<f32> = (0..num_filters + 2)
            .map(|i| mel_to_hz(mel_low + i as f32 * (mel_high - mel_low) / intervals))
            .collect();

        let dk = source_range.width() / num_bins as f32;
        let mut weights = vec![0.0f32; num_filters * num_bins];
        let mut degenerate = Vec::new();

        for (row_idx, row) in weights.chunks_exact_mut(num_bins).enumerate() {
            let (left, center, right) = (edges[row_idx], edges[row_idx + 1], edges[row_idx + 2]);
            let rise = center - left;
            let fall = right - center;

            // coinciding edges leave the row all-zero
            if !(rise > 0.0 && fall > 0.0) {
                degenerate.push(row_idx);
                continue;
            }

            for (i, w) in row.iter_mut().enumerate() {
                let k = source_range.lower + dk * i as f32;
                *w = if k < left || k >= right {
                    0.0
                } else if k < center {
                    (k - left) / rise
                } else {
                    (right - k) / fall
                };
            }
        }

        if !degenerate.is_empty() {
            log::warn!(
                "Mel filter bank: {} of {} filters are degenerate (coinciding band edges over {}), rows left at zero: {:?}",
                degenerate.len(),
                num_filters,
                target_range,
                degenerate
            );
        }

        log::debug!(
            "Built mel filter bank: {} filters × {} bins, source {}, target {}",
            num_filters,
            num_bins,
            source_range,
            target_range
        );

        Ok(Self {
            source_range,
            target_range,
            num_bins,
            num_filters,
            edges,
            weights,
            degenerate,
        })
    }

    /// Matrix-vector product: band energies of a magnitude spectrum
    pub fn apply(&self, spectrum: &[f32], energies: &mut [f32]) {
        debug_assert_eq!(spectrum.len(), self.num_bins);
        debug_assert_eq!(energies.len(), self.num_filters);

        for (row, energy) in self.weights.chunks_exact(self.num_bins).zip(energies.iter_mut()) {
            *energy = row.iter().zip(spectrum).map(|(w, s)| w * s).sum();
        }
    }

    /// Weights of filter `m` (0-based)
    pub fn row(&self, m: usize) -> &[f32] {
        &self.weights[m * self.num_bins..(m + 1) * self.num_bins]
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn edges(&self) -> &[f32] {
        &self.edges
    }

    /// Frequency sampled by bin `i`
    pub fn bin_frequency(&self, i: usize) -> f32 {
        self.source_range.lower + self.source_range.width() / self.num_bins as f32 * i as f32
    }

    /// Rows that were zeroed because their band edges coincide
    pub fn degenerate_filters(&self) -> &[usize] {
        &self.degenerate
    }

    pub fn source_range(&self) -> FrequencyRange {
        self.source_range
    }

    pub fn target_range(&self) -> FrequencyRange {
        self.target_range
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn num_filters(&self) -> usize {
        self.num_filters
    }
}

fn validate(
    source: &FrequencyRange,
    target: &FrequencyRange,
    num_bins: usize,
    num_filters: usize,
) -> Result<()> {
    let invalid = |msg: String| Err(MfccError::InvalidFilterBankConfig(msg));

    if num_bins == 0 {
        return invalid("num_bins must be greater than zero".into());
    }
    if num_filters == 0 {
        return invalid("num_filters must be greater than zero".into());
    }
    let finite = [source.lower, source.upper, target.lower, target.upper]
        .iter()
        .all(|f| f.is_finite());
    if !finite {
        return invalid(format!("non-finite bounds in source {source} / target {target}"));
    }
    if source.lower < 0.0 || source.lower >= source.upper {
        return invalid(format!("source range {source} must be non-negative and increasing"));
    }
    if target.lower >= target.upper {
        return invalid(format!("target range {target} must be increasing"));
    }
    if !source.contains_range(target) {
        return invalid(format!("target range {target} lies outside source range {source}"));
    }
    Ok(())
}
