//! Tiered QC thresholds per dataset type.
//!
//! The catalog is an immutable value built once at startup and passed
//! explicitly into the assessment functions, so tests can inject alternate
//! thresholds without touching global state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QcError;

/// Pipeline the run belongs to. Determines which threshold table applies
/// and which secondary metric (coverage or data volume) is assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Bacterial,
    Viral,
    Metagenomic,
}

impl FromStr for DatasetType {
    type Err = QcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bacterial" => Ok(Self::Bacterial),
            "viral" => Ok(Self::Viral),
            "metagenomic" => Ok(Self::Metagenomic),
            other => Err(QcError::InvalidDatasetType(other.to_string())),
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bacterial => write!(f, "bacterial"),
            Self::Viral => write!(f, "viral"),
            Self::Metagenomic => write!(f, "metagenomic"),
        }
    }
}

/// Lower bounds for one bacterial quality tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacterialTier {
    pub min_quality: f64,
    pub min_coverage: f64,
    pub min_read_length: f64,
}

/// Lower bounds for one viral or metagenomic quality tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeTier {
    pub min_quality: f64,
    pub min_bp_count: u64,
}

/// Expected GC window for bacterial genomes, in percent.
/// Tier-independent: the same window applies whatever the verdict.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcRange {
    pub min: f64,
    pub max: f64,
}

/// Full bacterial threshold table. The `poor` tier carries the floors below
/// which values are called out as unusually bad (e.g. read length under
/// `poor.min_read_length` is flagged as unusually short for ONT data).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacterialThresholds {
    pub good: BacterialTier,
    pub fair: BacterialTier,
    pub poor: BacterialTier,
    pub gc_content: GcRange,
}

/// Full threshold table for the volume-based dataset types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeThresholds {
    pub good: VolumeTier,
    pub fair: VolumeTier,
    pub poor: VolumeTier,
}

/// Threshold table selected for one dataset type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Thresholds {
    Bacterial(BacterialThresholds),
    Volume(VolumeThresholds),
}

/// Immutable mapping from dataset type to its tiered thresholds.
///
/// Invariant: within each table, thresholds are monotonically non-decreasing
/// from poor to fair to good for every shared metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdCatalog {
    pub bacterial: BacterialThresholds,
    pub viral: VolumeThresholds,
    pub metagenomic: VolumeThresholds,
}

impl Default for ThresholdCatalog {
    fn default() -> Self {
        Self {
            bacterial: BacterialThresholds {
                good: BacterialTier {
                    min_quality: 15.0,
                    min_coverage: 50.0,
                    min_read_length: 3000.0,
                },
                fair: BacterialTier {
                    min_quality: 12.0,
                    min_coverage: 20.0,
                    min_read_length: 2000.0,
                },
                poor: BacterialTier {
                    min_quality: 12.0,
                    min_coverage: 20.0,
                    // Below this is unusually short for ONT bacterial runs
                    min_read_length: 1000.0,
                },
                gc_content: GcRange {
                    min: 25.0,
                    max: 75.0,
                },
            },
            viral: VolumeThresholds {
                good: VolumeTier {
                    min_quality: 15.0,
                    min_bp_count: 1_000_000,
                },
                fair: VolumeTier {
                    min_quality: 12.0,
                    min_bp_count: 500_000,
                },
                poor: VolumeTier {
                    min_quality: 12.0,
                    min_bp_count: 500_000,
                },
            },
            metagenomic: VolumeThresholds {
                good: VolumeTier {
                    min_quality: 15.0,
                    min_bp_count: 1_000_000_000,
                },
                fair: VolumeTier {
                    min_quality: 12.0,
                    min_bp_count: 500_000_000,
                },
                poor: VolumeTier {
                    min_quality: 12.0,
                    min_bp_count: 500_000_000,
                },
            },
        }
    }
}

impl ThresholdCatalog {
    /// Look up the threshold table for a dataset type.
    pub fn get(&self, dataset_type: DatasetType) -> Thresholds {
        match dataset_type {
            DatasetType::Bacterial => Thresholds::Bacterial(self.bacterial),
            DatasetType::Viral => Thresholds::Volume(self.viral),
            DatasetType::Metagenomic => Thresholds::Volume(self.metagenomic),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_type_tokens() {
        assert_eq!("bacterial".parse::<DatasetType>().unwrap(), DatasetType::Bacterial);
        assert_eq!("viral".parse::<DatasetType>().unwrap(), DatasetType::Viral);
        assert_eq!(
            "metagenomic".parse::<DatasetType>().unwrap(),
            DatasetType::Metagenomic
        );
    }

    #[test]
    fn test_unknown_token_is_an_error() {
        let err = "unknown".parse::<DatasetType>().unwrap_err();
        assert!(matches!(err, QcError::InvalidDatasetType(ref t) if t == "unknown"));
        // Case matters: tokens are exact
        assert!("Bacterial".parse::<DatasetType>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for dt in [
            DatasetType::Bacterial,
            DatasetType::Viral,
            DatasetType::Metagenomic,
        ] {
            assert_eq!(dt.to_string().parse::<DatasetType>().unwrap(), dt);
        }
    }

    #[test]
    fn test_bacterial_tiers_are_monotonic() {
        let t = ThresholdCatalog::default().bacterial;
        assert!(t.poor.min_quality <= t.fair.min_quality);
        assert!(t.fair.min_quality <= t.good.min_quality);
        assert!(t.poor.min_coverage <= t.fair.min_coverage);
        assert!(t.fair.min_coverage <= t.good.min_coverage);
        assert!(t.poor.min_read_length <= t.fair.min_read_length);
        assert!(t.fair.min_read_length <= t.good.min_read_length);
    }

    #[test]
    fn test_volume_tiers_are_monotonic() {
        let catalog = ThresholdCatalog::default();
        for t in [catalog.viral, catalog.metagenomic] {
            assert!(t.poor.min_quality <= t.fair.min_quality);
            assert!(t.fair.min_quality <= t.good.min_quality);
            assert!(t.poor.min_bp_count <= t.fair.min_bp_count);
            assert!(t.fair.min_bp_count <= t.good.min_bp_count);
        }
    }

    #[test]
    fn test_bacterial_gc_range_is_ordered() {
        let t = ThresholdCatalog::default().bacterial;
        assert!(t.gc_content.min < t.gc_content.max);
    }

    #[test]
    fn test_lookup_selects_matching_table() {
        let catalog = ThresholdCatalog::default();
        assert!(matches!(
            catalog.get(DatasetType::Bacterial),
            Thresholds::Bacterial(_)
        ));
        match catalog.get(DatasetType::Viral) {
            Thresholds::Volume(t) => assert_eq!(t.fair.min_bp_count, 500_000),
            Thresholds::Bacterial(_) => panic!("viral lookup returned bacterial thresholds"),
        }
    }
}
