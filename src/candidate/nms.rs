//! Non-maximum suppression for scored windows.

use crate::candidate::bbox::{iou, BoundingBox};

/// Default IoU threshold for suppression.
///
/// Fixed-size windows cluster around every true hit, so even slight overlap
/// eliminates the weaker box.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.1;

/// Sorts boxes by descending score; equal scores keep their input order.
pub(crate) fn sort_boxes_desc(boxes: &mut [BoundingBox]) {
    boxes.sort_by(|a, b| b.score.total_cmp(&a.score));
}

/// Greedy score-descending non-maximum suppression.
///
/// Repeatedly keeps the best remaining box and discards every other box whose
/// IoU with it is at least `iou_threshold`. No two boxes in the output have
/// IoU `>= iou_threshold`, so running the function on its own output returns
/// it unchanged.
pub fn suppress(boxes: &[BoundingBox], iou_threshold: f32) -> Vec<BoundingBox> {
    let mut remaining = boxes.to_vec();
    sort_boxes_desc(&mut remaining);

    let mut kept: Vec<BoundingBox> = Vec::new();
    while !remaining.is_empty() {
        let current = remaining.remove(0);
        remaining.retain(|other| iou(&current, other) < iou_threshold);
        kept.push(current);
    }

    kept
}
