//! Sliding-window enumeration over a target image.
//!
//! A `WindowGrid` is a plain value describing the placements; each call to
//! `iter` starts an independent row-major sweep, so concurrent scans never
//! share cursor state.

use crate::util::{SymScanError, SymScanResult};

/// Stride fraction used when a grid is built without an explicit one.
pub const DEFAULT_STRIDE_FRACTION: f64 = 0.7;

/// Fixed-size window placements over a target image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WindowGrid {
    target_width: u32,
    target_height: u32,
    window_width: u32,
    window_height: u32,
    step_x: u32,
    step_y: u32,
}

impl WindowGrid {
    /// Creates a grid with `step = floor(window * stride_fraction)`, clamped to 1.
    pub fn new(
        target_width: u32,
        target_height: u32,
        window_width: u32,
        window_height: u32,
        stride_fraction: f64,
    ) -> Self {
        Self {
            target_width,
            target_height,
            window_width,
            window_height,
            step_x: stride_step(window_width, stride_fraction),
            step_y: stride_step(window_height, stride_fraction),
        }
    }

    /// Like [`WindowGrid::new`] but rejects non-finite or non-positive strides.
    pub fn checked(
        target_width: u32,
        target_height: u32,
        window_width: u32,
        window_height: u32,
        stride_fraction: f64,
    ) -> SymScanResult<Self> {
        if !stride_fraction.is_finite() || stride_fraction <= 0.0 {
            return Err(SymScanError::validation(format!(
                "stride fraction must be positive, got {stride_fraction}"
            )));
        }
        Ok(Self::new(
            target_width,
            target_height,
            window_width,
            window_height,
            stride_fraction,
        ))
    }

    /// Creates a grid with [`DEFAULT_STRIDE_FRACTION`].
    pub fn with_default_stride(
        target_width: u32,
        target_height: u32,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self::new(
            target_width,
            target_height,
            window_width,
            window_height,
            DEFAULT_STRIDE_FRACTION,
        )
    }

    /// Returns the horizontal and vertical step in pixels.
    pub fn steps(&self) -> (u32, u32) {
        (self.step_x, self.step_y)
    }

    /// Returns the window size in pixels.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }

    /// Exclusive upper bounds on `x` and `y`, or `None` when nothing fits.
    fn limits(&self) -> Option<(u32, u32)> {
        if self.window_width >= self.target_width || self.window_height >= self.target_height {
            return None;
        }
        Some((
            self.target_width - self.window_width,
            self.target_height - self.window_height,
        ))
    }

    /// Returns the number of placements without enumerating them.
    pub fn len(&self) -> usize {
        match self.limits() {
            Some((max_x, max_y)) => {
                let cols = max_x.div_ceil(self.step_x) as usize;
                let rows = max_y.div_ceil(self.step_y) as usize;
                cols * rows
            }
            None => 0,
        }
    }

    /// Returns true when the window does not fit inside the target.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Starts a fresh row-major sweep over top-left corners `(x, y)`.
    pub fn iter(&self) -> Windows {
        let limits = self.limits();
        Windows {
            grid: *self,
            limits,
            x: 0,
            y: 0,
        }
    }
}

impl IntoIterator for &WindowGrid {
    type Item = (u32, u32);
    type IntoIter = Windows;

    fn into_iter(self) -> Windows {
        self.iter()
    }
}

/// Iterator over window corners produced by [`WindowGrid::iter`].
#[derive(Clone, Debug)]
pub struct Windows {
    grid: WindowGrid,
    limits: Option<(u32, u32)>,
    x: u32,
    y: u32,
}

impl Iterator for Windows {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        let (max_x, max_y) = self.limits?;
        if self.y >= max_y {
            return None;
        }

        let item = (self.x, self.y);
        self.x = self.x.saturating_add(self.grid.step_x);
        if self.x >= max_x {
            self.x = 0;
            self.y = self.y.saturating_add(self.grid.step_y);
        }
        Some(item)
    }
}

/// Free-function form of [`WindowGrid::new`] followed by `iter`.
pub fn generate(
    target_width: u32,
    target_height: u32,
    window_width: u32,
    window_height: u32,
    stride_fraction: f64,
) -> Windows {
    WindowGrid::new(
        target_width,
        target_height,
        window_width,
        window_height,
        stride_fraction,
    )
    .iter()
}

fn stride_step(window: u32, stride_fraction: f64) -> u32 {
    let step = (f64::from(window) * stride_fraction).floor();
    if step.is_finite() && step >= 1.0 {
        step.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::{generate, stride_step, WindowGrid};

    #[test]
    fn stride_step_floors_and_clamps() {
        assert_eq!(stride_step(100, 0.5), 50);
        assert_eq!(stride_step(15, 0.7), 10);
        assert_eq!(stride_step(1, 0.5), 1);
        assert_eq!(stride_step(10, 0.0), 1);
        assert_eq!(stride_step(10, f64::NAN), 1);
        assert_eq!(stride_step(6, 0.3333333), 1);
        assert_eq!(stride_step(30, 0.7), 21);
    }

    #[test]
    fn len_matches_enumeration() {
        for &(tw, th, ww, wh, f) in &[
            (300, 300, 100, 100, 0.5),
            (301, 257, 37, 19, 0.7),
            (64, 64, 3, 5, 0.1),
            (50, 50, 50, 10, 0.5),
        ] {
            let grid = WindowGrid::new(tw, th, ww, wh, f);
            assert_eq!(grid.len(), grid.iter().count());
        }
    }

    #[test]
    fn iteration_is_restartable() {
        let grid = WindowGrid::with_default_stride(200, 120, 30, 30);
        let first: Vec<_> = grid.iter().collect();
        let second: Vec<_> = (&grid).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(grid.steps(), (21, 21));
    }

    #[test]
    fn window_equal_to_target_is_empty() {
        assert_eq!(generate(100, 100, 100, 50, 0.5).count(), 0);
        assert_eq!(generate(100, 100, 50, 120, 0.5).count(), 0);
    }

    #[test]
    fn checked_rejects_bad_stride() {
        assert!(WindowGrid::checked(10, 10, 2, 2, 0.0).is_err());
        assert!(WindowGrid::checked(10, 10, 2, 2, f64::INFINITY).is_err());
        assert!(WindowGrid::checked(10, 10, 2, 2, 0.5).is_ok());
    }
}
