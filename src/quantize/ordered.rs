use image::RgbImage;
use rayon::prelude::*;

use crate::quantize::{algorithm::ThresholdMatrix, palette::Palette};

/// Ordered-dither pass. Pixels are independent, so rows run in parallel.
pub(crate) fn threshold(
    image: &RgbImage,
    palette: &Palette,
    matrix: &ThresholdMatrix,
    strength: f32,
) -> Vec<u8> {
    let w = image.width() as usize;
    let src = image.as_raw();
    let mut out = vec![0u8; w * image.height() as usize];
    if w == 0 {
        return out;
    }

    out.par_chunks_mut(w).enumerate().for_each(|(y, row)| {
        let line = &src[y * w * 3..(y + 1) * w * 3];
        for (x, (slot, px)) in row.iter_mut().zip(line.chunks_exact(3)).enumerate() {
            let off = matrix.offset(x, y, strength);
            let v = [
                (f32::from(px[0]) + off).clamp(0.0, 255.0),
                (f32::from(px[1]) + off).clamp(0.0, 255.0),
                (f32::from(px[2]) + off).clamp(0.0, 255.0),
            ];
            *slot = palette.nearest(v) as u8;
        }
    });
    out
}
