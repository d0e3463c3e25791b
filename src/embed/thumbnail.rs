//! Built-in oracle based on normalized thumbnails.
//!
//! Each region is resized to a small square, normalized per channel with the
//! ImageNet statistics, and flattened into the feature vector. It needs no
//! model weights, which makes it the default oracle for the service and the
//! reference oracle for tests.

use crate::embed::{Embedding, EmbeddingOracle, Tensor};
use crate::util::{SymScanError, SymScanResult};
use ::image::imageops::{self, FilterType};
use ::image::RgbImage;
use serde::{Deserialize, Serialize};

const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Configuration for [`ThumbnailOracle`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Side length of the square thumbnail in pixels.
    pub size: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self { size: 32 }
    }
}

/// Thumbnail oracle producing `3 * size * size` dimensional embeddings.
#[derive(Clone, Debug)]
pub struct ThumbnailOracle {
    size: u32,
}

impl ThumbnailOracle {
    /// Creates an oracle, rejecting a zero thumbnail size.
    pub fn new(cfg: ThumbnailConfig) -> SymScanResult<Self> {
        if cfg.size == 0 {
            return Err(SymScanError::validation("thumbnail size must be at least 1"));
        }
        Ok(Self { size: cfg.size })
    }

    /// Returns the embedding dimension.
    pub fn dimension(&self) -> usize {
        3 * (self.size as usize) * (self.size as usize)
    }
}

impl Default for ThumbnailOracle {
    fn default() -> Self {
        Self {
            size: ThumbnailConfig::default().size,
        }
    }
}

impl EmbeddingOracle for ThumbnailOracle {
    fn preprocess(&self, image: &RgbImage) -> SymScanResult<Tensor> {
        if image.width() == 0 || image.height() == 0 {
            return Err(SymScanError::oracle("cannot preprocess an empty image"));
        }

        let side = self.size as usize;
        let resized = imageops::resize(image, self.size, self.size, FilterType::Triangle);
        let plane = side * side;
        let mut data = vec![0.0f32; 3 * plane];
        for (idx, pixel) in resized.pixels().enumerate() {
            for c in 0..3 {
                let value = f32::from(pixel.0[c]) / 255.0;
                data[c * plane + idx] = (value - CHANNEL_MEAN[c]) / CHANNEL_STD[c];
            }
        }

        Tensor::new(3, side, side, data)
    }

    fn embed(&self, tensor: &Tensor) -> SymScanResult<Embedding> {
        let side = self.size as usize;
        if tensor.shape() != (3, side, side) {
            let (c, h, w) = tensor.shape();
            return Err(SymScanError::oracle(format!(
                "expected a 3x{side}x{side} tensor, got {c}x{h}x{w}"
            )));
        }
        Ok(Embedding::new(tensor.as_slice().to_vec()))
    }
}
