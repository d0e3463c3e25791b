//! Convenience helpers for reading and encoding images via the `image` crate.

use crate::util::{SymScanError, SymScanResult};
use ::image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::Path;

/// Reads an encoded image file, rejecting missing or empty files.
pub fn read_image_bytes<P: AsRef<Path>>(path: P) -> SymScanResult<Vec<u8>> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| {
        SymScanError::validation(format!("cannot read {}: {err}", path.display()))
    })?;
    if bytes.is_empty() {
        return Err(SymScanError::validation(format!(
            "{} is empty",
            path.display()
        )));
    }
    Ok(bytes)
}

/// Encodes RGB pixels as PNG bytes.
pub fn encode_png(img: &RgbImage) -> SymScanResult<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .map_err(|err| SymScanError::Internal(format!("png encoding failed: {err}")))?;
    Ok(out.into_inner())
}
