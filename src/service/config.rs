//! Service configuration loaded from JSON.

use crate::embed::ThumbnailConfig;
use crate::search::{PredictConfig, ScanConfig};
use crate::util::{SymScanError, SymScanResult};
use serde::{Deserialize, Serialize};

/// Default listen / connect address.
pub const DEFAULT_ADDR: &str = "localhost:50051";
/// Default number of requests served concurrently.
pub const DEFAULT_WORKERS: usize = 10;

const MIB: usize = 1024 * 1024;

/// Per-operation message size limits, applied to sending and receiving.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageLimits {
    /// Largest `Predict` message in bytes.
    pub predict_max_message_bytes: usize,
    /// Largest `ScanBlueprint` message in bytes; blueprints are large scans.
    pub scan_max_message_bytes: usize,
}

impl Default for MessageLimits {
    fn default() -> Self {
        Self {
            predict_max_message_bytes: 10 * MIB,
            scan_max_message_bytes: 50 * MIB,
        }
    }
}

impl MessageLimits {
    /// Largest limit across operations; the transport must accept it.
    pub fn transport_max(&self) -> usize {
        self.predict_max_message_bytes
            .max(self.scan_max_message_bytes)
    }
}

/// Configuration for the detection service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// `host:port` to bind.
    pub addr: String,
    /// Size of the worker pool; further requests queue.
    pub workers: usize,
    /// Optional per-request deadline in milliseconds.
    pub request_timeout_ms: Option<u64>,
    pub limits: MessageLimits,
    pub predict: PredictConfig,
    pub scan: ScanConfig,
    pub oracle: ThumbnailConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            workers: DEFAULT_WORKERS,
            request_timeout_ms: None,
            limits: MessageLimits::default(),
            predict: PredictConfig::default(),
            scan: ScanConfig::default(),
            oracle: ThumbnailConfig::default(),
        }
    }
}

impl ServiceConfig {
    /// Rejects configurations the service cannot run with.
    pub fn validate(&self) -> SymScanResult<()> {
        if self.addr.trim().is_empty() {
            return Err(SymScanError::validation("addr must be set"));
        }
        if self.workers == 0 {
            return Err(SymScanError::validation("workers must be at least 1"));
        }
        if self.limits.predict_max_message_bytes == 0 || self.limits.scan_max_message_bytes == 0 {
            return Err(SymScanError::validation("message limits must be positive"));
        }
        if self.request_timeout_ms == Some(0) {
            return Err(SymScanError::validation(
                "request_timeout_ms must be positive when set",
            ));
        }
        self.predict.validate()?;
        self.scan.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::{MessageLimits, ServiceConfig};

    #[test]
    fn defaults_match_service_contract() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.addr, "localhost:50051");
        assert_eq!(cfg.workers, 10);
        assert_eq!(cfg.limits.predict_max_message_bytes, 10 * 1024 * 1024);
        assert_eq!(cfg.limits.scan_max_message_bytes, 50 * 1024 * 1024);
        assert_eq!(cfg.limits.transport_max(), 50 * 1024 * 1024);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_workers_rejected() {
        let cfg = ServiceConfig {
            workers: 0,
            ..ServiceConfig::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ServiceConfig {
            limits: MessageLimits {
                predict_max_message_bytes: 0,
                ..MessageLimits::default()
            },
            ..ServiceConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
