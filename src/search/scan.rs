//! Embedding-based comparison and sliding-window scans.

use crate::candidate::{suppress, BoundingBox};
use crate::embed::{cosine_similarity, Embedding, EmbeddingOracle};
use crate::image::DecodedImage;
use crate::search::window::WindowGrid;
use crate::search::{PredictConfig, ScanConfig};
use crate::trace::{enter_span, trace_log};
use crate::util::SymScanResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Result of comparing two whole images.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PredictOutcome {
    /// Cosine similarity of the two embeddings.
    pub score: f32,
    /// Whether `score` is strictly above the match threshold.
    pub is_match: bool,
}

/// Result of a blueprint scan.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanReport {
    /// Number of windows evaluated.
    pub windows: usize,
    /// Number of windows admitted before suppression.
    pub candidates: usize,
    /// Suppressed matches, best score first.
    pub matches: Vec<BoundingBox>,
}

/// Embeds both images once and compares them.
pub fn predict(
    oracle: &dyn EmbeddingOracle,
    reference: &DecodedImage,
    query: &DecodedImage,
    cfg: &PredictConfig,
) -> SymScanResult<PredictOutcome> {
    let emb_ref = oracle.embed_image(reference.pixels())?;
    let emb_query = oracle.embed_image(query.pixels())?;
    let score = cosine_similarity(&emb_ref, &emb_query)?;
    Ok(PredictOutcome {
        score,
        is_match: score > cfg.match_threshold,
    })
}

/// Scores every window of `grid` and returns the admitted candidates.
///
/// Candidates keep window enumeration order. With `cfg.parallel` and the
/// `rayon` feature, windows are scored on the rayon pool; the output is
/// identical to the sequential loop.
pub fn score_windows(
    oracle: &dyn EmbeddingOracle,
    reference: &Embedding,
    target: &DecodedImage,
    grid: &WindowGrid,
    cfg: &ScanConfig,
) -> SymScanResult<Vec<BoundingBox>> {
    let (win_w, win_h) = grid.window_size();
    let score_at = |(x, y): (u32, u32)| -> SymScanResult<Option<BoundingBox>> {
        let patch = target.crop(x, y, win_w, win_h)?;
        let embedding = oracle.embed_image(&patch)?;
        let score = cosine_similarity(reference, &embedding)?;
        Ok((score > cfg.score_threshold).then_some(BoundingBox {
            x,
            y,
            width: win_w,
            height: win_h,
            score,
        }))
    };

    #[cfg(feature = "rayon")]
    {
        if cfg.parallel {
            let corners: Vec<(u32, u32)> = grid.iter().collect();
            let scored = corners
                .par_iter()
                .map(|&corner| score_at(corner))
                .collect::<SymScanResult<Vec<_>>>()?;
            return Ok(scored.into_iter().flatten().collect());
        }
    }

    let mut candidates = Vec::new();
    for corner in grid.iter() {
        if let Some(bbox) = score_at(corner)? {
            candidates.push(bbox);
        }
    }
    Ok(candidates)
}

/// Finds the reference symbol inside the blueprint.
///
/// The window size is the reference's exact pixel size. A reference as large
/// as the blueprint in either dimension yields no windows and no matches.
pub fn scan_blueprint(
    oracle: &dyn EmbeddingOracle,
    reference: &DecodedImage,
    blueprint: &DecodedImage,
    cfg: &ScanConfig,
) -> SymScanResult<ScanReport> {
    let grid = WindowGrid::checked(
        blueprint.width(),
        blueprint.height(),
        reference.width(),
        reference.height(),
        cfg.stride_fraction,
    )?;
    let _span = enter_span!(
        "scan_blueprint",
        blueprint_w = blueprint.width(),
        blueprint_h = blueprint.height(),
        window_w = reference.width(),
        window_h = reference.height()
    );

    let emb_ref = oracle.embed_image(reference.pixels())?;
    let candidates = score_windows(oracle, &emb_ref, blueprint, &grid, cfg)?;
    let matches = suppress(&candidates, cfg.iou_threshold);

    trace_log!(
        info,
        "scan_complete",
        windows = grid.len(),
        candidates = candidates.len(),
        matches = matches.len()
    );
    Ok(ScanReport {
        windows: grid.len(),
        candidates: candidates.len(),
        matches,
    })
}
