use super::*;
use crate::bitplane::pack::unpack_bits;

fn bw() -> Palette {
    Palette::new("bw", vec![Rgb8::BLACK, Rgb8::WHITE]).unwrap()
}

#[test]
fn every_pixel_lands_in_exactly_one_plane() {
    let palette = Palette::default_palette();
    let img = RgbImage::from_fn(8, 4, |x, y| {
        palette.colors()[((x + y) as usize) % palette.len()].to_pixel()
    });
    let planes = split_planes(&img, &palette).unwrap();
    assert_eq!(planes.len(), 7);
    for i in 0..32 {
        assert_eq!(planes.iter().filter(|p| p[i]).count(), 1);
    }
}

#[test]
fn black_image_sets_only_the_black_plane() {
    let img = RgbImage::from_pixel(2, 4, image::Rgb([0, 0, 0]));
    let planes = BitPlanes::from_image(&img, &bw()).unwrap();
    assert_eq!(planes.planes, vec![vec![0xFF], vec![0x00]]);
    assert_eq!(unpack_bits(&planes.planes[0], 8).unwrap(), vec![true; 8]);
}

#[test]
fn duplicate_palette_colors_favor_first_entry() {
    let p = Palette::new("dup", vec![Rgb8::BLACK, Rgb8::WHITE, Rgb8::BLACK]).unwrap();
    let img = RgbImage::from_pixel(8, 1, image::Rgb([0, 0, 0]));
    let planes = split_planes(&img, &p).unwrap();
    assert!(planes[0].iter().all(|&b| b));
    assert!(planes[2].iter().all(|&b| !b));
}

#[test]
fn foreign_pixel_is_input_error() {
    let img = RgbImage::from_pixel(8, 1, image::Rgb([1, 2, 3]));
    assert!(matches!(split_planes(&img, &bw()), Err(InkError::Input(_))));
}

#[test]
fn odd_pixel_count_cannot_pack() {
    let img = RgbImage::from_pixel(3, 3, image::Rgb([255, 255, 255]));
    assert!(matches!(
        BitPlanes::from_image(&img, &bw()),
        Err(InkError::Input(_))
    ));
}
