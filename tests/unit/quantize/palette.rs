use super::*;

#[test]
fn catalog_palettes_are_literal() {
    let std7 = Palette::named("7Standard").unwrap();
    assert_eq!(std7.len(), 7);
    assert_eq!(std7.colors()[6], Rgb8::new(255, 165, 0));

    let eink = Palette::named("7eink").unwrap();
    assert_eq!(eink.name(), "7Eink");
    assert_eq!(eink.colors()[0], Rgb8::new(49, 40, 56));
    assert_eq!(eink.colors()[1], Rgb8::new(174, 173, 168));
}

#[test]
fn unknown_palette_resolves_to_default() {
    assert_eq!(Palette::resolve("grayscale_99").name(), "7Standard");
    assert!(Palette::named("grayscale_99").is_none());
}

#[test]
fn empty_palette_is_a_config_error() {
    assert!(matches!(
        Palette::new("empty", vec![]),
        Err(InkError::Config(_))
    ));
}

#[test]
fn nearest_prefers_lower_index_on_ties() {
    let p = Palette::new("bw", vec![Rgb8::BLACK, Rgb8::WHITE]).unwrap();
    assert_eq!(p.nearest([0.0, 0.0, 0.0]), 0);
    assert_eq!(p.nearest([250.0, 250.0, 250.0]), 1);
    assert_eq!(p.nearest([127.5, 127.5, 127.5]), 0);
}

#[test]
fn index_of_uses_exact_equality() {
    let p = Palette::default_palette();
    assert_eq!(p.index_of(Rgb8::new(0, 0, 255)), Some(2));
    assert_eq!(p.index_of(Rgb8::new(0, 0, 254)), None);
}
