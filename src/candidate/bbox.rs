//! Axis-aligned candidate rectangles in target image space.

use serde::{Deserialize, Serialize};

/// Scored window in target image pixels.
///
/// Represents either a scan candidate or a final match.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge (column) of the window.
    pub x: u32,
    /// Top edge (row) of the window.
    pub y: u32,
    /// Window width in pixels.
    pub width: u32,
    /// Window height in pixels.
    pub height: u32,
    /// Cosine similarity of the window against the reference.
    pub score: f32,
}

impl BoundingBox {
    /// Returns the box area in square pixels.
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns the exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Returns the exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }
}

/// Intersection-over-union of two boxes.
///
/// Returns 0 when the rectangles do not overlap or both are empty.
pub fn iou(a: &BoundingBox, b: &BoundingBox) -> f32 {
    let x0 = u64::from(a.x.max(b.x));
    let y0 = u64::from(a.y.max(b.y));
    let x1 = a.right().min(b.right());
    let y1 = a.bottom().min(b.bottom());

    let inter = x1.saturating_sub(x0) * y1.saturating_sub(y0);
    if inter == 0 {
        return 0.0;
    }

    let union = a.area() + b.area() - inter;
    (inter as f64 / union as f64) as f32
}

#[cfg(test)]
mod tests {
    use super::{iou, BoundingBox};

    fn bx(x: u32, y: u32, width: u32, height: u32) -> BoundingBox {
        BoundingBox {
            x,
            y,
            width,
            height,
            score: 1.0,
        }
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let a = bx(10, 20, 30, 40);
        assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn iou_of_disjoint_and_touching_boxes_is_zero() {
        assert_eq!(iou(&bx(0, 0, 10, 10), &bx(20, 20, 10, 10)), 0.0);
        assert_eq!(iou(&bx(0, 0, 10, 10), &bx(10, 0, 10, 10)), 0.0);
    }

    #[test]
    fn iou_of_half_shifted_boxes() {
        // 50 overlap over 150 union.
        let value = iou(&bx(0, 0, 10, 10), &bx(5, 0, 10, 10));
        assert!((value - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn iou_with_empty_box_is_zero() {
        assert_eq!(iou(&bx(0, 0, 0, 0), &bx(0, 0, 0, 0)), 0.0);
    }
}
