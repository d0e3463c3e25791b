//! One-shot search: sliding windows scored against a reference embedding.
//!
//! `window` enumerates placements, `scan` embeds and scores them and hands
//! the admitted candidates to suppression.

pub mod scan;
pub mod window;

pub use scan::{predict, scan_blueprint, score_windows, PredictOutcome, ScanReport};
pub use window::{generate, WindowGrid, Windows, DEFAULT_STRIDE_FRACTION};

use crate::candidate::nms::DEFAULT_IOU_THRESHOLD;
use crate::util::{SymScanError, SymScanResult};
use serde::{Deserialize, Serialize};

/// Default cosine similarity above which `predict` reports a match.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.75;
/// Default cosine similarity above which a scan window becomes a candidate.
pub const DEFAULT_SCORE_THRESHOLD: f32 = 0.85;
/// Default stride fraction for blueprint scans.
pub const DEFAULT_SCAN_STRIDE_FRACTION: f64 = 0.5;

/// Configuration for whole-image comparison.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictConfig {
    /// Similarity strictly above this value is a match.
    pub match_threshold: f32,
}

impl Default for PredictConfig {
    fn default() -> Self {
        Self {
            match_threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }
}

impl PredictConfig {
    /// Checks that the threshold is a finite cosine value.
    pub fn validate(&self) -> SymScanResult<()> {
        check_cosine("match_threshold", self.match_threshold)
    }
}

/// Configuration for sliding-window blueprint scans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Window step as a fraction of the window size.
    pub stride_fraction: f64,
    /// Similarity strictly above this value admits a window as a candidate.
    pub score_threshold: f32,
    /// Candidates overlapping a better one with at least this IoU are dropped.
    pub iou_threshold: f32,
    /// Score windows on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            stride_fraction: DEFAULT_SCAN_STRIDE_FRACTION,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            parallel: false,
        }
    }
}

impl ScanConfig {
    /// Checks stride and thresholds for usable values.
    pub fn validate(&self) -> SymScanResult<()> {
        if !self.stride_fraction.is_finite() || self.stride_fraction <= 0.0 {
            return Err(SymScanError::validation(format!(
                "stride_fraction must be positive, got {}",
                self.stride_fraction
            )));
        }
        check_cosine("score_threshold", self.score_threshold)?;
        if !(0.0..=1.0).contains(&self.iou_threshold) {
            return Err(SymScanError::validation(format!(
                "iou_threshold must lie in [0, 1], got {}",
                self.iou_threshold
            )));
        }
        Ok(())
    }
}

fn check_cosine(name: &str, value: f32) -> SymScanResult<()> {
    if !(-1.0..=1.0).contains(&value) {
        return Err(SymScanError::validation(format!(
            "{name} must lie in [-1, 1], got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{PredictConfig, ScanConfig};

    #[test]
    fn defaults_are_valid() {
        let scan = ScanConfig::default();
        assert_eq!(scan.stride_fraction, 0.5);
        assert_eq!(scan.score_threshold, 0.85);
        assert_eq!(scan.iou_threshold, 0.1);
        assert!(scan.validate().is_ok());
        assert_eq!(PredictConfig::default().match_threshold, 0.75);
        assert!(PredictConfig::default().validate().is_ok());
    }

    #[test]
    fn invalid_values_are_rejected() {
        let stride = ScanConfig {
            stride_fraction: 0.0,
            ..ScanConfig::default()
        };
        assert!(stride.validate().is_err());
        let iou = ScanConfig {
            iou_threshold: f32::NAN,
            ..ScanConfig::default()
        };
        assert!(iou.validate().is_err());
        let predict = PredictConfig {
            match_threshold: 1.5,
        };
        assert!(predict.validate().is_err());
    }
}
