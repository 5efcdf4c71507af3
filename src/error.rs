//! Error types for QC assessment.

use thiserror::Error;

/// Errors that can be returned while parsing or assessing a run.
///
/// The assessment entry points never downgrade any of these into a default
/// status: an incomplete or malformed trim summary aborts the run's
/// assessment and the caller decides how to present the failure.
#[derive(Debug, Error)]
pub enum QcError {
    /// Dataset-type token is not one of the supported pipelines.
    #[error("unknown dataset type '{0}', expected one of: bacterial, viral, metagenomic")]
    InvalidDatasetType(String),

    /// A required field was absent from the trim summary.
    #[error("trim summary is missing required field '{field}'")]
    MissingField { field: &'static str },

    /// A field held a value outside its valid domain.
    #[error("invalid value for '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    /// A histogram contained no non-zero bins where a maximum index is needed.
    #[error("{name} histogram has no non-zero bins")]
    DegenerateHistogram { name: &'static str },

    #[error("failed to read trim summary: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse trim summary JSON: {0}")]
    Json(#[from] serde_json::Error),
}
