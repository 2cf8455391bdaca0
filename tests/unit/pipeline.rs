use super::*;
use crate::{foundation::core::Rgb8, model::ResizeMethod};

fn params(w: u32, h: u32) -> RenderParams {
    RenderParams {
        width: w,
        height: h,
        ..RenderParams::default()
    }
}

#[test]
fn output_has_target_size_and_palette_colors() {
    let src = RgbImage::from_fn(64, 40, |x, y| image::Rgb([(x * 4) as u8, (y * 6) as u8, 90]));
    let out = render_image(&src, &params(32, 16), PipelineOptions::default()).unwrap();
    assert_eq!(out.dimensions(), (32, 16));
    let palette = Palette::default_palette();
    assert!(
        out.pixels()
            .all(|p| palette.index_of(Rgb8::from_pixel(*p)).is_some())
    );
}

#[test]
fn black_source_renders_black() {
    let src = RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]));
    let p = RenderParams {
        resize_method: ResizeMethod::Fill,
        ..params(2, 2)
    };
    let out = render_image(&src, &p, PipelineOptions::default()).unwrap();
    assert!(out.pixels().all(|px| px.0 == [0, 0, 0]));
}

#[test]
fn rejects_invalid_params_before_work() {
    let src = RgbImage::from_pixel(4, 4, image::Rgb([0, 0, 0]));
    let err = render_image(&src, &params(0, 4), PipelineOptions::default()).unwrap_err();
    assert!(matches!(err, crate::InkError::Input(_)));
}
