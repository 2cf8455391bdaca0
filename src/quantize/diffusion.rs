use image::RgbImage;

use crate::quantize::{algorithm::DiffusionKernel, palette::Palette};

/// Error-diffusion pass over `image`, returning one palette index per pixel in raster order.
///
/// Sequential by nature: each pixel depends on error pushed from its visited neighbours.
pub(crate) fn diffuse(
    image: &RgbImage,
    palette: &Palette,
    kernel: &DiffusionKernel,
    strength: f32,
    serpentine: bool,
) -> Vec<u8> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let mut acc: Vec<[f32; 3]> = image
        .pixels()
        .map(|p| [f32::from(p.0[0]), f32::from(p.0[1]), f32::from(p.0[2])])
        .collect();
    let colors: Vec<[f32; 3]> = palette.colors().iter().map(|c| c.to_f32()).collect();
    let taps = kernel.taps();
    let mut out = vec![0u8; w * h];

    for y in 0..h {
        let reverse = serpentine && y % 2 == 1;
        for step in 0..w {
            let x = if reverse { w - 1 - step } else { step };
            let i = y * w + x;
            let v = acc[i].map(|c| c.clamp(0.0, 255.0));
            let chosen = palette.nearest(v);
            out[i] = chosen as u8;

            let target = colors[chosen];
            let err = [v[0] - target[0], v[1] - target[1], v[2] - target[2]];
            if strength == 0.0 {
                continue;
            }
            for &(dx, dy, weight) in &taps {
                let dx = if reverse { -dx } else { dx };
                let nx = x as isize + dx;
                let ny = y + dy;
                if nx < 0 || nx as usize >= w || ny >= h {
                    continue;
                }
                let n = ny * w + nx as usize;
                let k = strength * weight;
                acc[n][0] += err[0] * k;
                acc[n][1] += err[1] * k;
                acc[n][2] += err[2] * k;
            }
        }
    }
    out
}
