use image::{RgbImage, imageops};

use crate::{
    foundation::core::Rgb8,
    foundation::error::{InkError, InkResult},
    model::ResizeMethod,
};

/// Resampling kernel used when scaling to the target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResampleFilter {
    /// Copy the closest source pixel.
    NearestNeighbor,
    /// Area average when shrinking; linear when enlarging.
    Box,
    /// Bilinear (triangle) kernel.
    Linear,
    /// Cubic with B = 1/3, C = 1/3. Rendered with the Catmull-Rom cubic, the nearest cubic
    /// `image` provides.
    MitchellNetravali,
    /// Cubic with B = 0, C = 1/2.
    CatmullRom,
    /// Gaussian kernel.
    Gaussian,
    /// Three-lobed Lanczos.
    #[default]
    Lanczos,
}

impl ResampleFilter {
    /// Every supported filter, in catalog order.
    pub const ALL: [ResampleFilter; 7] = [
        Self::NearestNeighbor,
        Self::Box,
        Self::Linear,
        Self::MitchellNetravali,
        Self::CatmullRom,
        Self::Gaussian,
        Self::Lanczos,
    ];

    /// Catalog name, as accepted by [`ResampleFilter::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::NearestNeighbor => "NearestNeighbor",
            Self::Box => "Box",
            Self::Linear => "Linear",
            Self::MitchellNetravali => "MitchellNetravali",
            Self::CatmullRom => "CatmullRom",
            Self::Gaussian => "Gaussian",
            Self::Lanczos => "Lanczos",
        }
    }

    /// Parse a filter name (case-insensitive). Anything unsupported means nearest-neighbor.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(name.trim()))
            .unwrap_or_else(|| {
                tracing::debug!(filter = name, "unsupported resample filter, using nearest");
                Self::NearestNeighbor
            })
    }

    fn to_image(self) -> imageops::FilterType {
        match self {
            Self::NearestNeighbor => imageops::FilterType::Nearest,
            Self::Box | Self::Linear => imageops::FilterType::Triangle,
            Self::MitchellNetravali | Self::CatmullRom => imageops::FilterType::CatmullRom,
            Self::Gaussian => imageops::FilterType::Gaussian,
            Self::Lanczos => imageops::FilterType::Lanczos3,
        }
    }
}

/// Fit `image` to `width`x`height` according to `method`.
///
/// Every method except [`ResizeMethod::Fit`] returns exactly the target size; `Fit` may come
/// out smaller on one axis.
#[tracing::instrument(skip(image), fields(src_w = image.width(), src_h = image.height()))]
pub fn fit_to_target(
    image: &RgbImage,
    width: u32,
    height: u32,
    filter: ResampleFilter,
    method: ResizeMethod,
) -> InkResult<RgbImage> {
    if width == 0 || height == 0 {
        return Err(InkError::input(format!(
            "target dimensions must be positive, got {width}x{height}"
        )));
    }
    if image.width() == 0 || image.height() == 0 {
        return Err(InkError::input("source image has no pixels"));
    }

    let out = match method {
        ResizeMethod::Fill | ResizeMethod::Stretch => scale(image, width, height, filter),
        ResizeMethod::Fit => {
            let (w, h) = contain(image.width(), image.height(), width, height);
            scale(image, w, h, filter)
        }
        ResizeMethod::Cut => {
            let (x, y, w, h) = centered_crop(image.width(), image.height(), width, height);
            let cropped = imageops::crop_imm(image, x, y, w, h).to_image();
            scale(&cropped, width, height, filter)
        }
        ResizeMethod::FillWhite => letterbox(image, width, height, filter, Rgb8::WHITE),
        ResizeMethod::FillBlack => letterbox(image, width, height, filter, Rgb8::BLACK),
    };
    Ok(out)
}

fn scale(image: &RgbImage, width: u32, height: u32, filter: ResampleFilter) -> RgbImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }
    if filter == ResampleFilter::Box && width <= image.width() && height <= image.height() {
        return imageops::thumbnail(image, width, height);
    }
    imageops::resize(image, width, height, filter.to_image())
}

fn letterbox(
    image: &RgbImage,
    width: u32,
    height: u32,
    filter: ResampleFilter,
    paper: Rgb8,
) -> RgbImage {
    let (w, h) = contain(image.width(), image.height(), width, height);
    let content = scale(image, w, h, filter);
    let mut canvas = RgbImage::from_pixel(width, height, paper.to_pixel());
    imageops::replace(
        &mut canvas,
        &content,
        i64::from((width - w) / 2),
        i64::from((height - h) / 2),
    );
    canvas
}

/// Largest size with the source aspect that fits inside the target. Never below 1x1.
pub(crate) fn contain(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32) {
    let (sw, sh, dw, dh) = (
        u64::from(src_w),
        u64::from(src_h),
        u64::from(dst_w),
        u64::from(dst_h),
    );
    // Compare sw/sh with dw/dh without floating point.
    if sw * dh >= sh * dw {
        let h = div_round(sh * dw, sw).clamp(1, dh);
        (dst_w, h as u32)
    } else {
        let w = div_round(sw * dh, sh).clamp(1, dw);
        (w as u32, dst_h)
    }
}

/// Source rectangle `(x, y, w, h)` with the target aspect, centered; the odd pixel goes to the
/// far side.
pub(crate) fn centered_crop(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    let (sw, sh, dw, dh) = (
        u64::from(src_w),
        u64::from(src_h),
        u64::from(dst_w),
        u64::from(dst_h),
    );
    if sw * dh > sh * dw {
        let w = div_round(sh * dw, dh).clamp(1, sw) as u32;
        ((src_w - w) / 2, 0, w, src_h)
    } else if sw * dh < sh * dw {
        let h = div_round(sw * dh, dw).clamp(1, sh) as u32;
        (0, (src_h - h) / 2, src_w, h)
    } else {
        (0, 0, src_w, src_h)
    }
}

fn div_round(num: u64, den: u64) -> u64 {
    (num + den / 2) / den
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/resize.rs"]
mod tests;
