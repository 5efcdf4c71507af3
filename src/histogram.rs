//! Histogram summaries for downstream report rendering.
//!
//! The trimmer emits fixed-size histograms padded with trailing zero bins.
//! These summaries trim the padding and precompute the proportions and
//! display bounds the renderer needs. They never feed back into the quality
//! classification.

use crate::error::QcError;

/// Highest bin index with a non-zero count.
///
/// An all-zero histogram has no such index and fails explicitly instead of
/// letting a later normalization divide by zero.
pub fn max_nonzero_index(histogram: &[u64], name: &'static str) -> Result<usize, QcError> {
    histogram
        .iter()
        .rposition(|&count| count > 0)
        .ok_or(QcError::DegenerateHistogram { name })
}

/// Quality-score histogram reduced to per-score read proportions.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityHistogramSummary {
    /// Highest quality score observed in any read.
    pub max_score: usize,
    /// Proportion of reads at each score from 0 through `max_score`.
    pub proportions: Vec<f64>,
}

/// Trim trailing zero bins and normalize the quality histogram.
pub fn summarize_quality(histogram: &[u64]) -> Result<QualityHistogramSummary, QcError> {
    let max_score = max_nonzero_index(histogram, "quality")?;
    let trimmed = &histogram[..=max_score];
    let total_reads: u64 = trimmed.iter().sum();
    let proportions = trimmed
        .iter()
        .map(|&count| count as f64 / total_reads as f64)
        .collect();
    Ok(QualityHistogramSummary {
        max_score,
        proportions,
    })
}

/// Read-length histogram reduced to the window the renderer displays.
#[derive(Debug, Clone, PartialEq)]
pub struct LengthHistogramSummary {
    /// Highest occupied bin.
    pub max_bin: usize,
    /// First bin at which the cumulative count reaches 99% of reads. Bounds
    /// the main plot; the full range is still available in `counts`.
    pub percentile_99_bin: usize,
    /// Bin width in bp.
    pub resolution: u64,
    /// Counts from bin 0 through `max_bin`.
    pub counts: Vec<u64>,
}

/// Trim trailing zero bins and locate the 99th-percentile display bound.
pub fn summarize_length(
    histogram: &[u64],
    resolution: u64,
) -> Result<LengthHistogramSummary, QcError> {
    if resolution == 0 {
        return Err(QcError::InvalidInput {
            field: "Length Resolution",
            reason: "bin width must be positive".to_string(),
        });
    }
    let max_bin = max_nonzero_index(histogram, "length")?;
    let counts: Vec<u64> = histogram[..=max_bin].to_vec();

    let total_reads: u64 = counts.iter().sum();
    let target = 0.99 * total_reads as f64;
    let mut cumulative = 0u64;
    let mut percentile_99_bin = max_bin;
    for (bin, &count) in counts.iter().enumerate() {
        cumulative += count;
        if cumulative as f64 >= target {
            percentile_99_bin = bin;
            break;
        }
    }

    Ok(LengthHistogramSummary {
        max_bin,
        percentile_99_bin,
        resolution,
        counts,
    })
}

impl LengthHistogramSummary {
    /// Center of a bin in bp, for plotting.
    pub fn bin_center(&self, bin: usize) -> f64 {
        (bin as f64 + 0.5) * self.resolution as f64
    }

    /// Inclusive-exclusive bp range covered by a bin.
    pub fn bin_edges(&self, bin: usize) -> (u64, u64) {
        (bin as u64 * self.resolution, (bin as u64 + 1) * self.resolution)
    }
}
