//! Mapping a selection drawn on a resized preview back to full resolution.

use crate::util::{SymScanError, SymScanResult};

/// Rectangle drawn on a preview, in preview pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Integer rectangle in full-resolution pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Selection {
    /// Scales the selection by `original_width / display_width` and rounds.
    ///
    /// The scaled rectangle is rejected, not clipped, when it is empty or
    /// extends past the `original_width x original_height` image.
    pub fn to_full_resolution(
        &self,
        display_width: u32,
        original_width: u32,
        original_height: u32,
    ) -> SymScanResult<PixelRect> {
        if display_width == 0 {
            return Err(SymScanError::validation("display width must be positive"));
        }
        let values = [self.left, self.top, self.width, self.height];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(SymScanError::validation(format!(
                "selection has negative or non-finite coordinates: {self:?}"
            )));
        }

        let scale = f64::from(original_width) / f64::from(display_width);
        let scaled = values.map(|v| (v * scale).round());
        let [x, y, width, height] = scaled;
        if width < 1.0 || height < 1.0 {
            return Err(SymScanError::validation("selection is empty after scaling"));
        }
        if x + width > f64::from(original_width) || y + height > f64::from(original_height) {
            return Err(SymScanError::validation(format!(
                "selection {width}x{height}+{x}+{y} exceeds the {original_width}x{original_height} image"
            )));
        }

        Ok(PixelRect {
            x: x as u32,
            y: y as u32,
            width: width as u32,
            height: height as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{PixelRect, Selection};

    #[test]
    fn scales_uniformly_and_rounds() {
        let sel = Selection {
            left: 10.0,
            top: 20.2,
            width: 33.3,
            height: 14.0,
        };
        // 2100 / 700 = 3.
        let rect = sel.to_full_resolution(700, 2100, 1500).unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 30,
                y: 61,
                width: 100,
                height: 42,
            }
        );
    }

    #[test]
    fn rejects_out_of_bounds_and_empty() {
        let past_edge = Selection {
            left: 690.0,
            top: 0.0,
            width: 20.0,
            height: 20.0,
        };
        assert!(past_edge.to_full_resolution(700, 1400, 1000).is_err());

        let tiny = Selection {
            left: 0.0,
            top: 0.0,
            width: 0.1,
            height: 5.0,
        };
        assert!(tiny.to_full_resolution(700, 700, 700).is_err());
        assert!(tiny.to_full_resolution(0, 700, 700).is_err());
    }
}
