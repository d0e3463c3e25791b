//! Request images: encoded bytes validated and decoded once per request.
//!
//! A `DecodedImage` keeps the encoded payload next to its RGB pixels so the
//! pipeline can report sizes and crop windows without decoding twice.

pub mod io;
pub mod selection;

use crate::util::{SymScanError, SymScanResult};
use ::image::RgbImage;

/// Encoded image decoded to RGB, immutable once loaded.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    encoded_len: usize,
    pixels: RgbImage,
}

impl DecodedImage {
    /// Validates and decodes image bytes.
    ///
    /// `role` names the input in error messages ("reference", "blueprint").
    /// Empty or undecodable payloads fail with [`SymScanError::Validation`].
    pub fn decode(bytes: &[u8], role: &str) -> SymScanResult<Self> {
        if bytes.is_empty() {
            return Err(SymScanError::validation(format!("{role} image is empty")));
        }
        let decoded = ::image::load_from_memory(bytes).map_err(|err| {
            SymScanError::validation(format!("{role} image could not be decoded: {err}"))
        })?;
        let pixels = decoded.to_rgb8();
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(SymScanError::validation(format!(
                "{role} image has zero width or height"
            )));
        }
        Ok(Self {
            encoded_len: bytes.len(),
            pixels,
        })
    }

    /// Wraps already decoded pixels.
    pub fn from_rgb(pixels: RgbImage) -> SymScanResult<Self> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(SymScanError::validation("image has zero width or height"));
        }
        Ok(Self {
            encoded_len: 0,
            pixels,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Returns the size of the encoded payload in bytes (0 if built from pixels).
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }

    /// Returns the decoded RGB pixels.
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }

    /// Copies a window out of the image.
    ///
    /// The window must lie fully inside the image.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> SymScanResult<RgbImage> {
        let inside = width > 0
            && height > 0
            && u64::from(x) + u64::from(width) <= u64::from(self.width())
            && u64::from(y) + u64::from(height) <= u64::from(self.height());
        if !inside {
            return Err(SymScanError::Internal(format!(
                "window {width}x{height}+{x}+{y} outside {}x{} image",
                self.width(),
                self.height()
            )));
        }
        Ok(::image::imageops::crop_imm(&self.pixels, x, y, width, height).to_image())
    }
}

#[cfg(test)]
mod tests {
    use super::DecodedImage;
    use crate::image::io::encode_png;
    use crate::SymScanError;
    use ::image::{Rgb, RgbImage};

    #[test]
    fn decode_rejects_empty_and_garbage() {
        assert!(matches!(
            DecodedImage::decode(&[], "reference"),
            Err(SymScanError::Validation { .. })
        ));
        assert!(matches!(
            DecodedImage::decode(b"\x89PNG garbage", "blueprint"),
            Err(SymScanError::Validation { .. })
        ));
    }

    #[test]
    fn decode_reports_dimensions() {
        let bytes = encode_png(&RgbImage::from_pixel(7, 5, Rgb([1, 2, 3]))).unwrap();
        let img = DecodedImage::decode(&bytes, "reference").unwrap();
        assert_eq!((img.width(), img.height()), (7, 5));
        assert_eq!(img.encoded_len(), bytes.len());
    }

    #[test]
    fn crop_checks_bounds() {
        let img = DecodedImage::from_rgb(RgbImage::new(10, 10)).unwrap();
        assert_eq!(img.crop(2, 3, 8, 7).unwrap().dimensions(), (8, 7));
        assert!(img.crop(3, 0, 8, 1).is_err());
        assert!(img.crop(0, 0, 0, 1).is_err());
    }
}
