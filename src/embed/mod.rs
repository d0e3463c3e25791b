//! Embedding oracle seam and feature vectors.
//!
//! The oracle turns an image region into a fixed-length feature vector. It is
//! constructed once, shared read-only behind an `Arc`, and must be safe to call
//! from many requests at once.

pub mod similarity;
pub mod thumbnail;

pub use similarity::cosine_similarity;
pub use thumbnail::{ThumbnailConfig, ThumbnailOracle};

use crate::util::{SymScanError, SymScanResult};
use ::image::RgbImage;

/// Normalized channel-major image tensor ready for embedding.
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    channels: usize,
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl Tensor {
    /// Creates a CHW tensor, checking that `data` matches the shape.
    pub fn new(channels: usize, height: usize, width: usize, data: Vec<f32>) -> SymScanResult<Self> {
        let expected = channels
            .checked_mul(height)
            .and_then(|v| v.checked_mul(width))
            .ok_or_else(|| SymScanError::oracle("tensor shape overflows"))?;
        if expected == 0 || data.len() != expected {
            return Err(SymScanError::oracle(format!(
                "tensor data has {} values, shape {channels}x{height}x{width} needs {expected}",
                data.len()
            )));
        }
        Ok(Self {
            channels,
            height,
            width,
            data,
        })
    }

    /// Returns `(channels, height, width)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.channels, self.height, self.width)
    }

    /// Returns the values in channel-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

/// Fixed-length feature vector produced by an oracle.
#[derive(Clone, Debug, PartialEq)]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    /// Wraps raw feature values.
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Returns the number of dimensions.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the vector has no dimensions.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the feature values.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

/// Vision feature extractor consumed by the detection pipeline.
///
/// Both operations are synchronous and side-effect free. Failures must be
/// reported as [`SymScanError::Oracle`].
pub trait EmbeddingOracle: Send + Sync {
    /// Converts a decoded image region into a normalized tensor.
    fn preprocess(&self, image: &RgbImage) -> SymScanResult<Tensor>;

    /// Maps a tensor to its feature vector.
    fn embed(&self, tensor: &Tensor) -> SymScanResult<Embedding>;

    /// Preprocesses and embeds a decoded image region.
    fn embed_image(&self, image: &RgbImage) -> SymScanResult<Embedding> {
        let tensor = self.preprocess(image)?;
        self.embed(&tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::{Embedding, Tensor};
    use crate::SymScanError;

    #[test]
    fn tensor_rejects_mismatched_data() {
        let err = Tensor::new(3, 2, 2, vec![0.0; 11]).err().unwrap();
        assert!(matches!(err, SymScanError::Oracle { .. }));
        assert!(Tensor::new(0, 2, 2, Vec::new()).is_err());
    }

    #[test]
    fn tensor_reports_shape() {
        let tensor = Tensor::new(3, 2, 4, vec![0.5; 24]).unwrap();
        assert_eq!(tensor.shape(), (3, 2, 4));
        assert_eq!(tensor.as_slice().len(), 24);
    }

    #[test]
    fn embedding_from_vec() {
        let emb = Embedding::from(vec![1.0, 2.0]);
        assert_eq!(emb.len(), 2);
        assert!(!emb.is_empty());
        assert_eq!(emb.as_slice(), &[1.0, 2.0]);
    }
}
