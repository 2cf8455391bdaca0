use std::path::Path;

use image::RgbImage;

use crate::foundation::error::{InkError, InkResult};

/// Decode an image file into opaque RGB8, compositing any alpha onto white paper.
pub fn load_source(path: &Path) -> InkResult<RgbImage> {
    let decoded = image::open(path)
        .map_err(|e| InkError::input(format!("cannot read image '{}': {e}", path.display())))?;
    if !decoded.color().has_alpha() {
        return Ok(decoded.to_rgb8());
    }
    Ok(flatten_onto_white(&decoded.to_rgba8()))
}

pub(crate) fn flatten_onto_white(rgba: &image::RgbaImage) -> RgbImage {
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let a = u16::from(src.0[3]);
        let inv = 255 - a;
        for c in 0..3 {
            dst.0[c] = ((u16::from(src.0[c]) * a + 255 * inv + 127) / 255) as u8;
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/source.rs"]
mod tests;
