//! Long-read QC assessment toolkit
//!
//! Assesses the quality of long-read sequencing runs from the summary
//! statistics an external trimming tool produces alongside its output.
//!
//! This library provides shared functionality for:
//! - Tiered QC thresholds per dataset type (bacterial, viral, metagenomic)
//! - Derived run metrics (read/base/length deltas, estimated coverage)
//! - Three-tier quality classification with human-readable diagnostics
//! - Histogram summaries for downstream report rendering
//! - Multi-run cohort reporting
//!
//! The assessment itself is a pure computation over one in-memory record:
//! no I/O, no shared state between runs, safe to evaluate runs in parallel.

pub mod assessment;
pub mod error;
pub mod histogram;
pub mod metrics;
pub mod reporting;
pub mod stats;
pub mod thresholds;

pub use assessment::{assess, QualityAssessment, QualityStatus};
pub use error::QcError;
pub use metrics::DerivedMetrics;
pub use reporting::RunQcReport;
pub use stats::RawQcStatistics;
pub use thresholds::{DatasetType, ThresholdCatalog};
