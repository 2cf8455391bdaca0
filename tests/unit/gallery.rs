use image::RgbImage;

use super::*;
use crate::foundation::error::InkError;

struct White;

impl ArtifactBuilder for White {
    fn build(&self, _: &SourceImage, p: &RenderParams) -> InkResult<RgbImage> {
        Ok(RgbImage::from_pixel(p.width, p.height, image::Rgb([255, 255, 255])))
    }
}

fn config(dir: &std::path::Path) -> InkConfig {
    InkConfig {
        database_path: dir.join("index.db"),
        cache_dir: dir.join("cache"),
        rotation_seed: Some(1),
        ..InkConfig::default()
    }
}

fn source(id: &str) -> SourceImage {
    SourceImage::new(SourceImageId::new(id).unwrap(), format!("/photos/{id}.jpg"))
}

fn params() -> RenderParams {
    RenderParams {
        width: 16,
        height: 8,
        ..RenderParams::default()
    }
}

#[test]
fn advance_on_empty_gallery_leaves_cursor_alone() {
    let dir = tempfile::tempdir().unwrap();
    let g = Gallery::with_builder(&config(dir.path()), Arc::new(White)).unwrap();
    let mut cursor = DeviceCursor::new("frame-1");
    assert!(matches!(
        g.advance(&mut cursor, &params()),
        Err(InkError::SequenceEmpty(_))
    ));
    assert_eq!(cursor.current_source_image_id, None);
}

#[test]
fn advance_moves_cursor_and_exports_planes() {
    let dir = tempfile::tempdir().unwrap();
    let g = Gallery::with_builder(&config(dir.path()), Arc::new(White)).unwrap();
    g.sync_sources(&[source("a"), source("b")]).unwrap();

    let mut cursor = DeviceCursor::new("frame-1");
    let first = g.advance(&mut cursor, &params()).unwrap();
    assert_eq!(cursor.current_source_image_id.as_ref(), Some(&first.source_image_id));
    assert_eq!(first.planes.len(), 7);
    assert!(first.planes.iter().all(|p| p.is_file()));

    let second = g.advance(&mut cursor, &params()).unwrap();
    assert_ne!(first.source_image_id, second.source_image_id);
    let third = g.advance(&mut cursor, &params()).unwrap();
    assert_eq!(third.source_image_id, first.source_image_id);
    assert_eq!(third.artifact.id, first.artifact.id);
}

#[test]
fn sync_evicts_artifacts_of_vanished_sources() {
    let dir = tempfile::tempdir().unwrap();
    let g = Gallery::with_builder(&config(dir.path()), Arc::new(White)).unwrap();
    g.sync_sources(&[source("a"), source("b")]).unwrap();
    let a = g
        .cache()
        .get_or_create(&SourceImageId::new("a").unwrap(), &params())
        .unwrap();

    let report = g.sync_sources(&[source("b")]).unwrap();
    assert_eq!(report.removed_sources, vec![SourceImageId::new("a").unwrap()]);
    assert_eq!(report.evicted_artifacts, 1);
    assert_eq!(report.rotation.removed, vec![SourceImageId::new("a").unwrap()]);
    assert!(!a.storage_path.exists());
    assert_eq!(g.rotation().order().unwrap(), vec![SourceImageId::new("b").unwrap()]);
    assert!(g.catalog().all_artifacts().unwrap().is_empty());
}
