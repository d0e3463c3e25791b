//! symscan finds repeated symbols in large drawings by one-shot matching.
//!
//! A single reference crop is embedded, a fixed-size window is swept across
//! the blueprint, every window is scored by cosine similarity against the
//! reference, and overlapping hits are pruned by greedy non-maximum
//! suppression. The [`service`] module exposes the pipeline over gRPC with a
//! bounded worker pool; scoring can optionally run on rayon via the `rayon`
//! feature.

pub mod candidate;
pub mod embed;
pub mod image;
pub mod search;
pub mod service;
mod trace;
pub mod util;

pub use candidate::{iou, suppress, BoundingBox};
pub use embed::{cosine_similarity, Embedding, EmbeddingOracle, Tensor, ThumbnailOracle};
pub use image::DecodedImage;
pub use search::{
    PredictConfig, PredictOutcome, ScanConfig, ScanReport, WindowGrid, DEFAULT_MATCH_THRESHOLD,
    DEFAULT_SCORE_THRESHOLD,
};
pub use service::{Detector, DetectorClient, ServiceConfig};
pub use util::{SymScanError, SymScanResult};
