//! Palette quantization: error diffusion and ordered dithering onto a fixed palette.

pub(crate) mod algorithm;
pub(crate) mod diffusion;
pub(crate) mod dither;
pub(crate) mod ordered;
pub(crate) mod palette;
