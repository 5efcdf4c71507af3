//! Quality classification and diagnostic generation.
//!
//! The verdict is conjunctive over two axes: mean quality and a secondary
//! metric (estimated coverage for bacterial runs, total data volume for
//! viral and metagenomic runs). A run failing either axis cannot be rated
//! above the tier where it fails, however far the other axis exceeds its
//! tier. Diagnostics are generated from a decision table over the four tier
//! comparisons so every combination has an auditable phrasing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::QcError;
use crate::metrics::{estimated_coverage, gc_percent, DerivedMetrics};
use crate::stats::RawQcStatistics;
use crate::thresholds::{
    BacterialThresholds, DatasetType, GcRange, ThresholdCatalog, Thresholds, VolumeThresholds,
};

/// Overall verdict for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityStatus {
    Good,
    Fair,
    Poor,
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Good => write!(f, "good"),
            Self::Fair => write!(f, "fair"),
            Self::Poor => write!(f, "poor"),
        }
    }
}

/// Verdict plus the ordered diagnostics that justify it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub status: QualityStatus,
    pub message: String,
    pub points_to_check: Vec<String>,
}

/// Assess one run against the catalog thresholds for its dataset type.
///
/// Returns the derived metrics together with the assessment. Fails on any
/// incomplete or out-of-domain input instead of defaulting the verdict.
pub fn assess(
    raw: &RawQcStatistics,
    dataset_type: DatasetType,
    catalog: &ThresholdCatalog,
) -> Result<(DerivedMetrics, QualityAssessment), QcError> {
    raw.validate()?;
    let metrics = DerivedMetrics::from_raw(raw, dataset_type);
    let assessment = match catalog.get(dataset_type) {
        Thresholds::Bacterial(thresholds) => assess_bacterial(raw, &metrics, &thresholds),
        Thresholds::Volume(thresholds) => assess_volume(raw, &metrics, &thresholds),
    };
    log::debug!(
        "run classified {} ({} diagnostics) for {} analysis",
        assessment.status,
        assessment.points_to_check.len(),
        dataset_type
    );
    Ok((metrics, assessment))
}

/// Tier comparisons for the two classification axes, all non-strict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TierFlags {
    quality_fair: bool,
    quality_good: bool,
    secondary_fair: bool,
    secondary_good: bool,
}

impl TierFlags {
    fn status(self) -> QualityStatus {
        if self.quality_good && self.secondary_good {
            QualityStatus::Good
        } else if self.quality_fair && self.secondary_fair {
            QualityStatus::Fair
        } else {
            QualityStatus::Poor
        }
    }
}

/// Display strings for the secondary axis, so the decision table reads the
/// same whether the axis is depth or volume.
struct SecondaryAxis {
    noun: &'static str,
    noun_capitalized: &'static str,
    /// Observed value, e.g. "4.0x" or "600,000 bp".
    value: String,
    /// Fair-tier threshold, e.g. "20x" or "500,000 bp".
    fair: String,
    /// Fair-tier threshold as recommended in the both-fail phrasing,
    /// e.g. "20x coverage" or "500,000 bp".
    recommendation: String,
}

fn assess_bacterial(
    raw: &RawQcStatistics,
    metrics: &DerivedMetrics,
    thresholds: &BacterialThresholds,
) -> QualityAssessment {
    let quality = metrics.mean_quality;
    let coverage = estimated_coverage(raw);

    let flags = TierFlags {
        quality_fair: quality >= thresholds.fair.min_quality,
        quality_good: quality >= thresholds.good.min_quality,
        secondary_fair: coverage >= thresholds.fair.min_coverage,
        secondary_good: coverage >= thresholds.good.min_coverage,
    };
    let axis = SecondaryAxis {
        noun: "sequencing depth",
        noun_capitalized: "Sequencing depth",
        value: format!("{coverage:.1}x"),
        fair: format!("{}x", thresholds.fair.min_coverage),
        recommendation: format!("{}x coverage", thresholds.fair.min_coverage),
    };

    let mut points = vec![quality_secondary_diagnostic(
        flags,
        quality,
        thresholds.fair.min_quality,
        &axis,
    )];
    if let Some(point) = read_length_diagnostic(metrics.mean_length.after, thresholds) {
        points.push(point);
    }
    points.push(gc_content_diagnostic(gc_percent(raw), &thresholds.gc_content));

    let status = flags.status();
    QualityAssessment {
        status,
        message: status_message(status, metrics.dataset_type),
        points_to_check: points,
    }
}

fn assess_volume(
    raw: &RawQcStatistics,
    metrics: &DerivedMetrics,
    thresholds: &VolumeThresholds,
) -> QualityAssessment {
    let quality = metrics.mean_quality;
    let bp_count = raw.bp_count_after;

    let flags = TierFlags {
        quality_fair: quality >= thresholds.fair.min_quality,
        quality_good: quality >= thresholds.good.min_quality,
        secondary_fair: bp_count >= thresholds.fair.min_bp_count,
        secondary_good: bp_count >= thresholds.good.min_bp_count,
    };
    let axis = SecondaryAxis {
        noun: "data volume",
        noun_capitalized: "Data volume",
        value: format!("{} bp", group_thousands(bp_count)),
        fair: format!("{} bp", group_thousands(thresholds.fair.min_bp_count)),
        recommendation: format!("{} bp", group_thousands(thresholds.fair.min_bp_count)),
    };

    let points = vec![quality_secondary_diagnostic(
        flags,
        quality,
        thresholds.fair.min_quality,
        &axis,
    )];

    let status = flags.status();
    QualityAssessment {
        status,
        message: status_message(status, metrics.dataset_type),
        points_to_check: points,
    }
}

/// Decision table over the four tier booleans. Each arm is one phrasing; the
/// embedded values are the observed metrics and the fair-tier thresholds.
fn quality_secondary_diagnostic(
    flags: TierFlags,
    quality: f64,
    fair_quality: f64,
    axis: &SecondaryAxis,
) -> String {
    let TierFlags {
        quality_fair,
        quality_good,
        secondary_fair,
        secondary_good,
    } = flags;
    let SecondaryAxis {
        noun,
        noun_capitalized,
        value,
        fair,
        recommendation,
    } = axis;

    match (quality_fair, quality_good, secondary_fair, secondary_good) {
        (false, _, false, _) => format!(
            "Both sequencing quality (Q{quality:.1}) and {noun} ({value}) are below \
             recommended levels. We recommend at least Q{fair_quality} and \
             {recommendation} for reliable analysis"
        ),
        (false, _, true, true) => format!(
            "Despite excellent {noun} ({value}), the quality scores (Q{quality:.1}) \
             are below recommended levels (Q{fair_quality})"
        ),
        (false, _, true, false) => format!(
            "The quality scores (Q{quality:.1}) are below recommended levels \
             (Q{fair_quality}), though {noun} ({value}) is adequate"
        ),
        (true, true, false, _) => format!(
            "Despite excellent quality scores (Q{quality:.1}), the {noun} ({value}) \
             is below recommended levels ({fair})"
        ),
        (true, false, false, _) => format!(
            "The {noun} ({value}) is below recommended levels ({fair}), though \
             quality scores (Q{quality:.1}) are adequate"
        ),
        (true, true, true, true) => format!(
            "Excellent sequencing quality (Q{quality:.1}) and {noun} ({value}), \
             both well above recommended levels"
        ),
        (true, true, true, false) => format!(
            "Excellent quality scores (Q{quality:.1}). {noun_capitalized} ({value}) \
             is good but could be improved"
        ),
        (true, false, true, true) => format!(
            "Excellent {noun} ({value}). Quality scores (Q{quality:.1}) are good \
             but could be improved"
        ),
        (true, false, true, false) => format!(
            "Both quality scores (Q{quality:.1}) and {noun} ({value}) are good, \
             though could be improved for optimal results"
        ),
    }
}

/// Mean-read-length band check for bacterial runs. Lengths between the fair
/// and good tiers are unremarkable and produce no diagnostic.
fn read_length_diagnostic(
    mean_length_after: f64,
    thresholds: &BacterialThresholds,
) -> Option<String> {
    if mean_length_after < thresholds.poor.min_read_length {
        Some(format!(
            "The average read length is unusually short (below {} bp) for ONT \
             bacterial sequencing",
            thresholds.poor.min_read_length
        ))
    } else if mean_length_after < thresholds.fair.min_read_length {
        Some(format!(
            "The average read length is shorter (< {}) than typically seen with \
             ONT bacterial sequencing",
            thresholds.fair.min_read_length
        ))
    } else if mean_length_after >= thresholds.good.min_read_length {
        Some(format!(
            "Good average read length ({mean_length_after:.0} bp) for ONT bacterial \
             sequencing"
        ))
    } else {
        None
    }
}

fn gc_content_diagnostic(gc_percent: f64, range: &GcRange) -> String {
    if gc_percent < range.min || gc_percent > range.max {
        format!(
            "The GC content ({gc_percent:.1}%) falls outside the typical range for \
             bacterial genomes ({}-{}%). This might indicate potential \
             contamination or bias in the sequencing",
            range.min, range.max
        )
    } else {
        format!(
            "GC content ({gc_percent:.1}%) is within expected range for bacterial \
             genomes ({}-{}%)",
            range.min, range.max
        )
    }
}

fn status_message(status: QualityStatus, dataset_type: DatasetType) -> String {
    let context = match dataset_type {
        DatasetType::Bacterial => "bacterial analysis",
        DatasetType::Viral => "viral genome analysis",
        DatasetType::Metagenomic => "metagenomic analysis",
    };
    match status {
        QualityStatus::Good => format!("Data quality is good for {context}"),
        QualityStatus::Fair => {
            format!("Data is suitable for {context} but some quality aspects may affect results")
        }
        QualityStatus::Poor => {
            format!("Data quality issues may significantly impact {context} reliability")
        }
    }
}

/// Thousands separators for base-pair counts in diagnostics.
fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
