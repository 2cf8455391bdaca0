use image::RgbImage;

use crate::{
    bitplane::pack::pack_bits,
    foundation::core::Rgb8,
    foundation::error::{InkError, InkResult},
    quantize::palette::Palette,
};

/// Split a quantized image into one mask per palette entry, in palette order.
///
/// Exactly one mask is set per pixel. When a palette repeats a color the first entry wins.
pub fn split_planes(image: &RgbImage, palette: &Palette) -> InkResult<Vec<Vec<bool>>> {
    let n = image.width() as usize * image.height() as usize;
    let mut planes = vec![vec![false; n]; palette.len()];
    for (i, (x, y, px)) in image.enumerate_pixels().enumerate() {
        let color = Rgb8::from_pixel(*px);
        let idx = palette.index_of(color).ok_or_else(|| {
            InkError::input(format!(
                "pixel ({x}, {y}) = ({}, {}, {}) is not in palette '{}'",
                color.r,
                color.g,
                color.b,
                palette.name()
            ))
        })?;
        planes[idx][i] = true;
    }
    Ok(planes)
}

/// Packed planes of one quantized image, indexed by palette position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitPlanes {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// One packed mask per palette entry.
    pub planes: Vec<Vec<u8>>,
}

impl BitPlanes {
    /// Split and pack `image`. The pixel count must be a multiple of 8.
    pub fn from_image(image: &RgbImage, palette: &Palette) -> InkResult<Self> {
        let planes = split_planes(image, palette)?
            .iter()
            .map(|mask| pack_bits(mask))
            .collect::<InkResult<Vec<_>>>()?;
        Ok(Self {
            width: image.width(),
            height: image.height(),
            planes,
        })
    }

    /// Number of planes.
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    /// `true` when there are no planes.
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bitplane/planes.rs"]
mod tests;
