//! Error types for symscan.

use thiserror::Error;

/// Result alias for symscan operations.
pub type SymScanResult<T> = std::result::Result<T, SymScanError>;

/// Errors that can occur while detecting symbols.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SymScanError {
    /// Input image bytes or parameters are missing or unreadable.
    #[error("invalid input: {reason}")]
    Validation { reason: String },
    /// The embedding oracle failed to decode or process an image region.
    #[error("embedding oracle failed: {reason}")]
    Oracle { reason: String },
    /// Two embeddings of unequal length were compared.
    #[error("embedding dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },
    /// A request payload exceeds the limit configured for its operation.
    #[error("{operation} payload of {got} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge {
        operation: &'static str,
        got: usize,
        limit: usize,
    },
    /// The request outlived its deadline; its result was abandoned.
    #[error("{operation} exceeded its {timeout_ms} ms deadline")]
    DeadlineExceeded {
        operation: &'static str,
        timeout_ms: u64,
    },
    /// Any other unexpected failure during scoring or suppression.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SymScanError {
    pub(crate) fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub(crate) fn oracle(reason: impl Into<String>) -> Self {
        Self::Oracle {
            reason: reason.into(),
        }
    }
}
