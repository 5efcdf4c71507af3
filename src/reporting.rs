//! Multi-run QC reporting.
//!
//! Aggregates per-run assessments across a sequencing cohort and exports the
//! combined report for downstream rendering.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::assessment::{QualityAssessment, QualityStatus};
use crate::metrics::DerivedMetrics;

/// One run's full QC result: derived metrics plus the assessment that
/// justifies the verdict. This is the record the report renderer consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunQcReport {
    pub name: String,
    pub metrics: DerivedMetrics,
    pub assessment: QualityAssessment,
}

/// Aggregated verdict counts across a cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub total_runs: usize,
    pub good_runs: usize,
    pub fair_runs: usize,
    pub poor_runs: usize,
    pub good_rate: f64,
    pub average_quality: f64,
    /// Mean estimated coverage over the runs that carry one (bacterial runs).
    /// 0 when the cohort has none.
    pub average_coverage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRunReport {
    pub runs: Vec<RunQcReport>,
    pub summary: CohortSummary,
}

impl MultiRunReport {
    /// Aggregate per-run reports into a cohort report.
    pub fn from_runs(runs: Vec<RunQcReport>) -> Self {
        let total_runs = runs.len();
        let count_status = |status: QualityStatus| {
            runs.iter()
                .filter(|r| r.assessment.status == status)
                .count()
        };
        let good_runs = count_status(QualityStatus::Good);
        let fair_runs = count_status(QualityStatus::Fair);
        let poor_runs = count_status(QualityStatus::Poor);

        let good_rate = if total_runs > 0 {
            (good_runs as f64 / total_runs as f64) * 100.0
        } else {
            0.0
        };
        let average_quality = if total_runs > 0 {
            runs.iter().map(|r| r.metrics.mean_quality).sum::<f64>() / total_runs as f64
        } else {
            0.0
        };
        let coverages: Vec<f64> = runs
            .iter()
            .filter_map(|r| r.metrics.estimated_coverage())
            .collect();
        let average_coverage = if !coverages.is_empty() {
            coverages.iter().sum::<f64>() / coverages.len() as f64
        } else {
            0.0
        };

        Self {
            runs,
            summary: CohortSummary {
                total_runs,
                good_runs,
                fair_runs,
                poor_runs,
                good_rate,
                average_quality,
                average_coverage,
            },
        }
    }

    /// Export the cohort report to JSON.
    pub fn export_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json_content = serde_json::to_string_pretty(self)?;
        fs::write(&path, json_content)
            .with_context(|| format!("writing cohort report to {}", path.as_ref().display()))?;
        Ok(())
    }
}

/// Load every `*.json` run report in a directory, sorted by file name so the
/// cohort report is stable across filesystems.
pub fn load_run_reports<P: AsRef<Path>>(dir: P) -> Result<Vec<RunQcReport>> {
    let dir = dir.as_ref();
    let mut paths: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading report directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut runs = Vec::with_capacity(paths.len());
    for path in paths {
        let json = fs::read_to_string(&path)
            .with_context(|| format!("reading run report {}", path.display()))?;
        let run: RunQcReport = serde_json::from_str(&json)
            .with_context(|| format!("parsing run report {}", path.display()))?;
        log::debug!("loaded run report '{}' from {}", run.name, path.display());
        runs.push(run);
    }
    Ok(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::assess;
    use crate::stats::RawQcStatistics;
    use crate::thresholds::{DatasetType, ThresholdCatalog};

    fn run_report(name: &str, mean_quality: f64, bp_count_after: u64) -> RunQcReport {
        let raw = RawQcStatistics {
            fragment_count_before: 50_000,
            fragment_count_after: 48_000,
            bp_count_before: bp_count_after + 10_000_000,
            bp_count_after,
            mean_length_before: 4100.0,
            mean_length_after: 4200.0,
            n50: 7000,
            gc_content: 0.48,
            mean_quality,
            quality_histogram: vec![0, 5, 100, 400],
            length_histogram: vec![10, 200, 50],
            length_resolution: 1000,
        };
        let (metrics, assessment) =
            assess(&raw, DatasetType::Bacterial, &ThresholdCatalog::default()).unwrap();
        RunQcReport {
            name: name.to_string(),
            metrics,
            assessment,
        }
    }

    #[test]
    fn test_cohort_counts_by_status() {
        let report = MultiRunReport::from_runs(vec![
            run_report("run_a", 16.0, 300_000_000),
            run_report("run_b", 13.0, 150_000_000),
            run_report("run_c", 9.0, 20_000_000),
            run_report("run_d", 17.0, 400_000_000),
        ]);
        assert_eq!(report.summary.total_runs, 4);
        assert_eq!(report.summary.good_runs, 2);
        assert_eq!(report.summary.fair_runs, 1);
        assert_eq!(report.summary.poor_runs, 1);
        assert_eq!(report.summary.good_rate, 50.0);
        assert_eq!(report.summary.average_quality, (16.0 + 13.0 + 9.0 + 17.0) / 4.0);
        assert_eq!(
            report.summary.average_coverage,
            (60.0 + 30.0 + 4.0 + 80.0) / 4.0
        );
    }

    #[test]
    fn test_empty_cohort_has_zero_rates() {
        let report = MultiRunReport::from_runs(Vec::new());
        assert_eq!(report.summary.total_runs, 0);
        assert_eq!(report.summary.good_rate, 0.0);
        assert_eq!(report.summary.average_quality, 0.0);
        assert_eq!(report.summary.average_coverage, 0.0);
    }

    #[test]
    fn test_volume_only_cohort_has_no_coverage_average() {
        let raw = RawQcStatistics {
            fragment_count_before: 2_000,
            fragment_count_after: 1_900,
            bp_count_before: 700_000,
            bp_count_after: 650_000,
            mean_length_before: 340.0,
            mean_length_after: 350.0,
            n50: 400,
            gc_content: 0.41,
            mean_quality: 14.0,
            quality_histogram: vec![0, 2, 50, 90],
            length_histogram: vec![5, 700, 10],
            length_resolution: 100,
        };
        let (metrics, assessment) =
            assess(&raw, DatasetType::Viral, &ThresholdCatalog::default()).unwrap();
        let report = MultiRunReport::from_runs(vec![RunQcReport {
            name: "viral_run".to_string(),
            metrics,
            assessment,
        }]);
        assert_eq!(report.summary.average_coverage, 0.0);
        assert_eq!(report.summary.average_quality, 14.0);
    }

    #[test]
    fn test_run_report_round_trips_through_json() {
        let run = run_report("run_a", 16.0, 300_000_000);
        let json = serde_json::to_string_pretty(&run).unwrap();
        let back: RunQcReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, run);
    }
}
