use super::*;

#[test]
fn missing_fields_take_defaults() {
    let cfg: InkConfig = serde_json::from_str(r#"{"cache_dir": "/var/cache/ink"}"#).unwrap();
    assert_eq!(cfg.cache_dir, PathBuf::from("/var/cache/ink"));
    assert_eq!(cfg.resample_filter, "Lanczos");
    assert_eq!(cfg.build_wait_timeout(), Duration::from_secs(30));
    assert!(!cfg.serpentine);
    assert_eq!(cfg.rotation_seed, None);
}

#[test]
fn zero_timeout_and_empty_cache_dir_are_rejected() {
    let cfg = InkConfig {
        build_wait_timeout_ms: 0,
        ..InkConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(InkError::Config(_))));

    let cfg = InkConfig {
        cache_dir: PathBuf::new(),
        ..InkConfig::default()
    };
    assert!(matches!(cfg.validate(), Err(InkError::Config(_))));
}

#[test]
fn from_path_reads_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.json");
    std::fs::write(
        &good,
        r#"{"resample_filter": "Box", "serpentine": true, "rotation_seed": 4}"#,
    )
    .unwrap();
    let cfg = InkConfig::from_path(&good).unwrap();
    assert_eq!(cfg.rotation_seed, Some(4));
    let opts = cfg.pipeline_options();
    assert!(opts.serpentine);
    assert_eq!(opts.filter, ResampleFilter::NearestNeighbor);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{"build_wait_timeout_ms": 0}"#).unwrap();
    assert!(matches!(InkConfig::from_path(&bad), Err(InkError::Config(_))));
    assert!(matches!(
        InkConfig::from_path(&dir.path().join("missing.json")),
        Err(InkError::Other(_))
    ));
}
