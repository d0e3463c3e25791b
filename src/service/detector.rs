//! Transport-independent detection context.
//!
//! A `Detector` owns the shared oracle and the thresholds. It is built once at
//! startup and borrowed by every request; requests share nothing else.

use crate::embed::{EmbeddingOracle, ThumbnailOracle};
use crate::image::DecodedImage;
use crate::search::{self, PredictConfig, PredictOutcome, ScanConfig, ScanReport};
use crate::service::config::ServiceConfig;
use crate::util::SymScanResult;
use std::sync::Arc;

/// Shared detection context.
#[derive(Clone)]
pub struct Detector {
    oracle: Arc<dyn EmbeddingOracle>,
    predict_cfg: PredictConfig,
    scan_cfg: ScanConfig,
}

impl Detector {
    /// Creates a detector with default thresholds.
    pub fn new(oracle: Arc<dyn EmbeddingOracle>) -> Self {
        Self {
            oracle,
            predict_cfg: PredictConfig::default(),
            scan_cfg: ScanConfig::default(),
        }
    }

    /// Builds the default thumbnail oracle and thresholds from a service config.
    pub fn from_config(cfg: &ServiceConfig) -> SymScanResult<Self> {
        cfg.validate()?;
        let oracle = ThumbnailOracle::new(cfg.oracle.clone())?;
        Ok(Self::new(Arc::new(oracle))
            .with_predict_config(cfg.predict.clone())
            .with_scan_config(cfg.scan.clone()))
    }

    /// Overrides the whole-image comparison configuration.
    pub fn with_predict_config(mut self, cfg: PredictConfig) -> Self {
        self.predict_cfg = cfg;
        self
    }

    /// Overrides the scan configuration.
    pub fn with_scan_config(mut self, cfg: ScanConfig) -> Self {
        self.scan_cfg = cfg;
        self
    }

    /// Compares two encoded images.
    ///
    /// Both inputs are decoded and validated before the oracle is called.
    pub fn predict(&self, reference: &[u8], query: &[u8]) -> SymScanResult<PredictOutcome> {
        let reference = DecodedImage::decode(reference, "reference")?;
        let query = DecodedImage::decode(query, "query")?;
        search::predict(self.oracle.as_ref(), &reference, &query, &self.predict_cfg)
    }

    /// Locates the reference symbol in an encoded blueprint.
    ///
    /// Both inputs are decoded and validated before the oracle is called.
    pub fn scan_blueprint(&self, reference: &[u8], blueprint: &[u8]) -> SymScanResult<ScanReport> {
        let reference = DecodedImage::decode(reference, "reference")?;
        let blueprint = DecodedImage::decode(blueprint, "blueprint")?;
        search::scan_blueprint(self.oracle.as_ref(), &reference, &blueprint, &self.scan_cfg)
    }
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("predict_cfg", &self.predict_cfg)
            .field("scan_cfg", &self.scan_cfg)
            .finish_non_exhaustive()
    }
}
