//! Candidate boxes and duplicate pruning.
//!
//! Includes the `BoundingBox` record, IoU, and greedy non-maximum suppression.

pub mod bbox;
pub mod nms;

pub use bbox::{iou, BoundingBox};
pub use nms::suppress;
