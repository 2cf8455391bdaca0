use super::*;

#[test]
fn transparent_pixels_become_white() {
    let mut rgba = image::RgbaImage::new(2, 1);
    rgba.put_pixel(0, 0, image::Rgba([0, 0, 0, 0]));
    rgba.put_pixel(1, 0, image::Rgba([10, 20, 30, 255]));
    let flat = flatten_onto_white(&rgba);
    assert_eq!(flat.get_pixel(0, 0).0, [255, 255, 255]);
    assert_eq!(flat.get_pixel(1, 0).0, [10, 20, 30]);
}

#[test]
fn unreadable_file_is_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("not-an-image.png");
    std::fs::write(&path, b"nope").unwrap();
    assert!(matches!(load_source(&path), Err(InkError::Input(_))));
    assert!(matches!(
        load_source(&dir.path().join("missing.png")),
        Err(InkError::Input(_))
    ));
}

#[test]
fn png_round_trips_through_loader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("px.png");
    RgbImage::from_pixel(3, 2, image::Rgb([1, 2, 3]))
        .save(&path)
        .unwrap();
    let img = load_source(&path).unwrap();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [1, 2, 3]);
}
