use image::RgbImage;

use crate::{
    foundation::error::{InkError, InkResult},
    quantize::{algorithm::DitherAlgorithm, diffusion, ordered, palette::Palette},
};

/// Engine-level quantizer switches that are not part of the per-request params.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QuantizeOptions {
    /// Traverse odd rows right-to-left with a mirrored kernel (error diffusion only).
    pub serpentine: bool,
}

/// Quantize `image` onto `palette`, returning one palette index per pixel in raster order.
#[tracing::instrument(
    skip_all,
    fields(
        w = image.width(),
        h = image.height(),
        palette = palette.name(),
        algorithm = algorithm.name(),
        strength = strength
    )
)]
pub fn quantize_indices(
    image: &RgbImage,
    palette: &Palette,
    algorithm: DitherAlgorithm,
    strength: f32,
    opts: QuantizeOptions,
) -> InkResult<Vec<u8>> {
    if !strength.is_finite() || strength < 0.0 {
        return Err(InkError::input(format!(
            "dither strength must be finite and >= 0, got {strength}"
        )));
    }
    if palette.is_empty() {
        return Err(InkError::config(format!(
            "palette '{}' has no colors",
            palette.name()
        )));
    }

    Ok(match algorithm {
        DitherAlgorithm::ErrorDiffusion(kernel) => {
            diffusion::diffuse(image, palette, kernel, strength, opts.serpentine)
        }
        DitherAlgorithm::Ordered(matrix) => ordered::threshold(image, palette, matrix, strength),
    })
}

/// Quantize `image` onto `palette`. Every output pixel is a palette member by value.
pub fn quantize(
    image: &RgbImage,
    palette: &Palette,
    algorithm: DitherAlgorithm,
    strength: f32,
    opts: QuantizeOptions,
) -> InkResult<RgbImage> {
    let indices = quantize_indices(image, palette, algorithm, strength, opts)?;
    let colors = palette.colors();
    let mut out = RgbImage::new(image.width(), image.height());
    for (px, &i) in out.pixels_mut().zip(indices.iter()) {
        *px = colors[usize::from(i)].to_pixel();
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/quantize/dither.rs"]
mod tests;
