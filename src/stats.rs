//! Raw per-run QC statistics.
//!
//! The trimming tool writes a JSON summary next to its trimmed output. This
//! module parses that summary into a validated [`RawQcStatistics`] record.
//! Field absence and out-of-domain values surface as typed errors before any
//! assessment runs; the record is read-only from then on.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::QcError;

/// One run's QC statistics as emitted by the trimmer.
///
/// Counts and histograms cover the run after trimming; the `*_before` fields
/// preserve the pre-trim values so the report can show what trimming removed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQcStatistics {
    pub fragment_count_before: u64,
    pub fragment_count_after: u64,
    pub bp_count_before: u64,
    pub bp_count_after: u64,
    pub mean_length_before: f64,
    pub mean_length_after: f64,
    pub n50: u64,
    /// GC fraction in 0..=1, not percent.
    pub gc_content: f64,
    /// Expected quality score E(Q) over all bases.
    pub mean_quality: f64,
    /// Read counts indexed by integer quality score.
    pub quality_histogram: Vec<u64>,
    /// Read counts in fixed-width length bins.
    pub length_histogram: Vec<u64>,
    /// Width of one length bin in bp.
    pub length_resolution: u64,
}

/// Trim summary JSON as written by the trimmer. Every field is optional so
/// that absence is reported as a [`QcError::MissingField`] naming the key,
/// and counts are signed so that negatives are reported as
/// [`QcError::InvalidInput`] rather than a deserialization failure.
#[derive(Debug, Deserialize)]
struct TrimSummary {
    #[serde(rename = "Org. Fragment Count")]
    org_fragment_count: Option<i64>,
    #[serde(rename = "Fragment Count")]
    fragment_count: Option<i64>,
    #[serde(rename = "Org. Bp Count")]
    org_bp_count: Option<i64>,
    #[serde(rename = "Bp Count")]
    bp_count: Option<i64>,
    #[serde(rename = "Org. Mean Read Length")]
    org_mean_read_length: Option<f64>,
    #[serde(rename = "Mean Read Length")]
    mean_read_length: Option<f64>,
    #[serde(rename = "N50")]
    n50: Option<i64>,
    #[serde(rename = "GC Content")]
    gc_content: Option<f64>,
    #[serde(rename = "E(Q)")]
    mean_quality: Option<f64>,
    #[serde(rename = "Q Distribution")]
    q_distribution: Option<Vec<i64>>,
    #[serde(rename = "Length Distribution")]
    length_distribution: Option<Vec<i64>>,
    #[serde(rename = "Length Resolution")]
    length_resolution: Option<i64>,
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, QcError> {
    value.ok_or(QcError::MissingField { field })
}

fn count(value: Option<i64>, field: &'static str) -> Result<u64, QcError> {
    let v = require(value, field)?;
    u64::try_from(v).map_err(|_| QcError::InvalidInput {
        field,
        reason: format!("count must be non-negative, got {v}"),
    })
}

fn histogram(value: Option<Vec<i64>>, field: &'static str) -> Result<Vec<u64>, QcError> {
    let bins = require(value, field)?;
    if bins.is_empty() {
        return Err(QcError::InvalidInput {
            field,
            reason: "histogram has no bins".to_string(),
        });
    }
    bins.into_iter()
        .map(|v| {
            u64::try_from(v).map_err(|_| QcError::InvalidInput {
                field,
                reason: format!("bin count must be non-negative, got {v}"),
            })
        })
        .collect()
}

impl RawQcStatistics {
    /// Parse and validate a trim summary from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, QcError> {
        let summary: TrimSummary = serde_json::from_str(json)?;
        Self::from_summary(summary)
    }

    /// Parse and validate a trim summary JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, QcError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    fn from_summary(summary: TrimSummary) -> Result<Self, QcError> {
        let stats = Self {
            fragment_count_before: count(summary.org_fragment_count, "Org. Fragment Count")?,
            fragment_count_after: count(summary.fragment_count, "Fragment Count")?,
            bp_count_before: count(summary.org_bp_count, "Org. Bp Count")?,
            bp_count_after: count(summary.bp_count, "Bp Count")?,
            mean_length_before: require(summary.org_mean_read_length, "Org. Mean Read Length")?,
            mean_length_after: require(summary.mean_read_length, "Mean Read Length")?,
            n50: count(summary.n50, "N50")?,
            gc_content: require(summary.gc_content, "GC Content")?,
            mean_quality: require(summary.mean_quality, "E(Q)")?,
            quality_histogram: histogram(summary.q_distribution, "Q Distribution")?,
            length_histogram: histogram(summary.length_distribution, "Length Distribution")?,
            length_resolution: count(summary.length_resolution, "Length Resolution")?,
        };
        stats.validate()?;
        Ok(stats)
    }

    /// Check domain constraints on the already-typed fields. Called by the
    /// JSON constructors and again by the assessment entry point, so records
    /// built directly in code get the same checks.
    pub fn validate(&self) -> Result<(), QcError> {
        finite_non_negative(self.mean_length_before, "Org. Mean Read Length")?;
        finite_non_negative(self.mean_length_after, "Mean Read Length")?;
        finite_non_negative(self.mean_quality, "E(Q)")?;
        if !self.gc_content.is_finite() || !(0.0..=1.0).contains(&self.gc_content) {
            return Err(QcError::InvalidInput {
                field: "GC Content",
                reason: format!("must be a fraction in 0..=1, got {}", self.gc_content),
            });
        }
        if self.quality_histogram.is_empty() {
            return Err(QcError::InvalidInput {
                field: "Q Distribution",
                reason: "histogram has no bins".to_string(),
            });
        }
        if self.length_histogram.is_empty() {
            return Err(QcError::InvalidInput {
                field: "Length Distribution",
                reason: "histogram has no bins".to_string(),
            });
        }
        if self.length_resolution == 0 {
            return Err(QcError::InvalidInput {
                field: "Length Resolution",
                reason: "bin width must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn finite_non_negative(value: f64, field: &'static str) -> Result<(), QcError> {
    if !value.is_finite() || value < 0.0 {
        return Err(QcError::InvalidInput {
            field,
            reason: format!("must be finite and non-negative, got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_json() -> String {
        r#"{
            "Org. Fragment Count": 100000,
            "Fragment Count": 95000,
            "Org. Bp Count": 320000000,
            "Bp Count": 300000000,
            "Org. Mean Read Length": 3900.5,
            "Mean Read Length": 4000.0,
            "N50": 6200,
            "GC Content": 0.50,
            "E(Q)": 16.0,
            "Q Distribution": [0, 0, 10, 500, 900, 40],
            "Length Distribution": [5, 120, 600, 300, 0, 0],
            "Length Resolution": 1000
        }"#
        .to_string()
    }

    #[test]
    fn test_parses_trimmer_keys() {
        let stats = RawQcStatistics::from_json_str(&summary_json()).unwrap();
        assert_eq!(stats.fragment_count_before, 100_000);
        assert_eq!(stats.fragment_count_after, 95_000);
        assert_eq!(stats.bp_count_after, 300_000_000);
        assert_eq!(stats.mean_quality, 16.0);
        assert_eq!(stats.length_resolution, 1000);
        assert_eq!(stats.quality_histogram.len(), 6);
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let json = summary_json().replace(r#""E(Q)": 16.0,"#, "");
        let err = RawQcStatistics::from_json_str(&json).unwrap_err();
        assert!(matches!(err, QcError::MissingField { field: "E(Q)" }));
    }

    #[test]
    fn test_negative_count_is_invalid() {
        let json = summary_json().replace(r#""Fragment Count": 95000"#, r#""Fragment Count": -1"#);
        let err = RawQcStatistics::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            QcError::InvalidInput {
                field: "Fragment Count",
                ..
            }
        ));
    }

    #[test]
    fn test_gc_fraction_out_of_range_is_invalid() {
        let json = summary_json().replace(r#""GC Content": 0.50"#, r#""GC Content": 50.0"#);
        let err = RawQcStatistics::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            QcError::InvalidInput {
                field: "GC Content",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_histogram_is_invalid() {
        let json = summary_json().replace(
            r#""Q Distribution": [0, 0, 10, 500, 900, 40]"#,
            r#""Q Distribution": []"#,
        );
        let err = RawQcStatistics::from_json_str(&json).unwrap_err();
        assert!(matches!(
            err,
            QcError::InvalidInput {
                field: "Q Distribution",
                ..
            }
        ));
    }

    #[test]
    fn test_non_numeric_field_is_a_parse_error() {
        let json = summary_json().replace(r#""N50": 6200"#, r#""N50": "6200""#);
        assert!(matches!(
            RawQcStatistics::from_json_str(&json).unwrap_err(),
            QcError::Json(_)
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_quality() {
        let mut stats = RawQcStatistics::from_json_str(&summary_json()).unwrap();
        stats.mean_quality = f64::NAN;
        assert!(matches!(
            stats.validate().unwrap_err(),
            QcError::InvalidInput { field: "E(Q)", .. }
        ));
    }

    #[test]
    fn test_zero_pre_trim_counts_are_allowed() {
        let json = summary_json()
            .replace(r#""Org. Fragment Count": 100000"#, r#""Org. Fragment Count": 0"#)
            .replace(r#""Org. Bp Count": 320000000"#, r#""Org. Bp Count": 0"#);
        assert!(RawQcStatistics::from_json_str(&json).is_ok());
    }
}
