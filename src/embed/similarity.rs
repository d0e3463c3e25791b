//! Cosine similarity between feature vectors.

use crate::embed::Embedding;
use crate::util::{SymScanError, SymScanResult};

/// Lower bound applied to each vector norm, so a zero vector scores 0.
const NORM_EPS: f64 = 1e-8;

/// Computes `a . b / (|a| |b|)` in `[-1, 1]`.
///
/// Accumulates in `f64` and evaluates the terms in a fixed order, so swapping
/// the arguments yields the same value. Neither input is modified.
pub fn cosine_similarity(a: &Embedding, b: &Embedding) -> SymScanResult<f32> {
    if a.len() != b.len() {
        return Err(SymScanError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&va, &vb) in a.as_slice().iter().zip(b.as_slice()) {
        let (va, vb) = (f64::from(va), f64::from(vb));
        dot += va * vb;
        norm_a += va * va;
        norm_b += vb * vb;
    }

    let denom = norm_a.sqrt().max(NORM_EPS) * norm_b.sqrt().max(NORM_EPS);
    let score = (dot / denom).clamp(-1.0, 1.0);
    Ok(score as f32)
}

#[cfg(test)]
mod tests {
    use super::cosine_similarity;
    use crate::embed::Embedding;
    use crate::SymScanError;

    #[test]
    fn parallel_vectors_score_one() {
        let a = Embedding::new(vec![1.0, 2.0, 3.0]);
        let b = Embedding::new(vec![2.0, 4.0, 6.0]);
        assert!((cosine_similarity(&a, &b).unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn opposite_and_orthogonal_vectors() {
        let a = Embedding::new(vec![1.0, 0.0]);
        let b = Embedding::new(vec![-1.0, 0.0]);
        let c = Embedding::new(vec![0.0, 5.0]);
        assert!((cosine_similarity(&a, &b).unwrap() + 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&a, &c).unwrap().abs() < 1e-6);
    }

    #[test]
    fn zero_vector_scores_zero() {
        let a = Embedding::new(vec![0.0; 4]);
        let b = Embedding::new(vec![1.0; 4]);
        assert_eq!(cosine_similarity(&a, &b).unwrap(), 0.0);
    }

    #[test]
    fn mismatched_lengths_fail() {
        let a = Embedding::new(vec![1.0; 3]);
        let b = Embedding::new(vec![1.0; 4]);
        assert_eq!(
            cosine_similarity(&a, &b),
            Err(SymScanError::DimensionMismatch { left: 3, right: 4 })
        );
    }
}
