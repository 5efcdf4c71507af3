//! Derived per-run metrics.
//!
//! Pure computations over a validated [`RawQcStatistics`] record. The
//! serialized field names are the contract the report renderer depends on;
//! renaming them is a breaking change.

use serde::{Deserialize, Serialize};

use crate::stats::RawQcStatistics;
use crate::thresholds::DatasetType;

/// Assumed genome size for coverage estimation, 5 Mbp (typical bacterial
/// genome). Coverage derived from it is an approximation, not an
/// alignment-based measurement.
pub const REFERENCE_GENOME_SIZE: u64 = 5_000_000;

/// Pre-trim and post-trim values with the magnitude of the percent change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta<T> {
    pub before: T,
    pub after: T,
    pub change: f64,
}

/// Metrics that only exist for one class of dataset type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScaleMetrics {
    /// Bacterial runs: depth against the reference genome size plus GC percent.
    Bacterial {
        estimated_coverage: f64,
        gc_content: f64,
    },
    /// Viral and metagenomic runs: total post-trim base pairs.
    Volume { bp_count: u64 },
}

/// Normalized metrics for one run, immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub dataset_type: DatasetType,
    pub read_count: MetricDelta<u64>,
    pub total_bases: MetricDelta<u64>,
    pub mean_length: MetricDelta<f64>,
    pub n50: u64,
    pub mean_quality: f64,
    #[serde(flatten)]
    pub scale: ScaleMetrics,
}

/// Magnitude of the percent change from `old_value` to `new_value`, one
/// decimal. Defined as 0 when the old value is 0, so runs that started empty
/// do not divide by zero. The sign is discarded: callers infer direction
/// from the before/after pair, not from this value.
pub fn percentage_change(new_value: f64, old_value: f64) -> f64 {
    if old_value == 0.0 {
        return 0.0;
    }
    round1((new_value - old_value) / old_value * 100.0).abs()
}

/// Estimated depth of coverage from post-trim bases, one decimal.
pub fn estimated_coverage(raw: &RawQcStatistics) -> f64 {
    round1(raw.bp_count_after as f64 / REFERENCE_GENOME_SIZE as f64)
}

/// GC content as a percent, one decimal.
pub fn gc_percent(raw: &RawQcStatistics) -> f64 {
    round1(raw.gc_content * 100.0)
}

pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

impl DerivedMetrics {
    /// Compute the full metric set for one run.
    pub fn from_raw(raw: &RawQcStatistics, dataset_type: DatasetType) -> Self {
        let scale = match dataset_type {
            DatasetType::Bacterial => ScaleMetrics::Bacterial {
                estimated_coverage: estimated_coverage(raw),
                gc_content: gc_percent(raw),
            },
            DatasetType::Viral | DatasetType::Metagenomic => ScaleMetrics::Volume {
                bp_count: raw.bp_count_after,
            },
        };

        Self {
            dataset_type,
            read_count: MetricDelta {
                before: raw.fragment_count_before,
                after: raw.fragment_count_after,
                change: percentage_change(
                    raw.fragment_count_after as f64,
                    raw.fragment_count_before as f64,
                ),
            },
            total_bases: MetricDelta {
                before: raw.bp_count_before,
                after: raw.bp_count_after,
                change: percentage_change(raw.bp_count_after as f64, raw.bp_count_before as f64),
            },
            mean_length: MetricDelta {
                before: round1(raw.mean_length_before),
                after: round1(raw.mean_length_after),
                change: percentage_change(raw.mean_length_after, raw.mean_length_before),
            },
            n50: raw.n50,
            mean_quality: round1(raw.mean_quality),
            scale,
        }
    }

    /// Estimated coverage, present only for bacterial runs.
    pub fn estimated_coverage(&self) -> Option<f64> {
        match self.scale {
            ScaleMetrics::Bacterial {
                estimated_coverage, ..
            } => Some(estimated_coverage),
            ScaleMetrics::Volume { .. } => None,
        }
    }

    /// GC percent, present only for bacterial runs.
    pub fn gc_content(&self) -> Option<f64> {
        match self.scale {
            ScaleMetrics::Bacterial { gc_content, .. } => Some(gc_content),
            ScaleMetrics::Volume { .. } => None,
        }
    }

    /// Post-trim base count, present only for viral and metagenomic runs.
    pub fn bp_count(&self) -> Option<u64> {
        match self.scale {
            ScaleMetrics::Bacterial { .. } => None,
            ScaleMetrics::Volume { bp_count } => Some(bp_count),
        }
    }
}
