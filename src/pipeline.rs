use std::path::Path;

use image::RgbImage;

use crate::{
    foundation::error::InkResult,
    geometry::{
        resize::{ResampleFilter, fit_to_target},
        source::load_source,
    },
    model::RenderParams,
    quantize::{
        algorithm::DitherAlgorithm,
        dither::{QuantizeOptions, quantize},
        palette::Palette,
    },
};

/// Engine-wide rendering switches. Not part of the artifact cache key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Kernel used by every resize.
    pub filter: ResampleFilter,
    /// Serpentine traversal for error diffusion.
    pub serpentine: bool,
}

/// Fit `image` to the requested panel geometry, then quantize it onto the requested palette.
///
/// Unknown palette and algorithm names resolve to their defaults.
pub fn render_image(
    image: &RgbImage,
    params: &RenderParams,
    opts: PipelineOptions,
) -> InkResult<RgbImage> {
    params.validate()?;
    let palette = Palette::resolve(&params.palette);
    let algorithm = DitherAlgorithm::resolve(&params.algorithm);
    let fitted = fit_to_target(
        image,
        params.width,
        params.height,
        opts.filter,
        params.resize_method,
    )?;
    quantize(
        &fitted,
        &palette,
        algorithm,
        params.strength,
        QuantizeOptions {
            serpentine: opts.serpentine,
        },
    )
}

/// [`render_image`] on a file decoded with [`load_source`].
#[tracing::instrument(skip(params, opts), fields(path = %path.display()))]
pub fn render_file(path: &Path, params: &RenderParams, opts: PipelineOptions) -> InkResult<RgbImage> {
    let image = load_source(path)?;
    render_image(&image, params, opts)
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
