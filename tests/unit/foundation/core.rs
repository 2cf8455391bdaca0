use super::*;

#[test]
fn source_ids_reject_blank_values() {
    assert!(SourceImageId::new("").is_err());
    assert!(SourceImageId::new("   ").is_err());
    assert_eq!(SourceImageId::new("abc").unwrap().as_str(), "abc");
}

#[test]
fn generated_artifact_ids_are_fresh_hex() {
    let a = ArtifactId::generate();
    let b = ArtifactId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 32);
    assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn rgb8_pixel_conversion_is_lossless() {
    let c = Rgb8::new(255, 165, 0);
    assert_eq!(Rgb8::from_pixel(c.to_pixel()), c);
    assert_eq!(c.to_f32(), [255.0, 165.0, 0.0]);
}
