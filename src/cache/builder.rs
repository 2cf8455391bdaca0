use image::RgbImage;

use crate::{
    foundation::error::InkResult,
    model::{RenderParams, SourceImage},
    pipeline::{PipelineOptions, render_file},
};

/// Produces the quantized pixels of one artifact.
///
/// Implementations must be deterministic for a given source and params.
pub trait ArtifactBuilder: Send + Sync {
    /// Render `source` with canonical `params` into palette pixels.
    fn build(&self, source: &SourceImage, params: &RenderParams) -> InkResult<RgbImage>;
}

/// Default builder: decode the source file, fit it, dither it.
#[derive(Clone, Copy, Debug, Default)]
pub struct PipelineBuilder {
    opts: PipelineOptions,
}

impl PipelineBuilder {
    /// Builder rendering with `opts`.
    pub fn new(opts: PipelineOptions) -> Self {
        Self { opts }
    }
}

impl ArtifactBuilder for PipelineBuilder {
    fn build(&self, source: &SourceImage, params: &RenderParams) -> InkResult<RgbImage> {
        render_file(&source.path, params, self.opts)
    }
}
