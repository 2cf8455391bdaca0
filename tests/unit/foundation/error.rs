use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(InkError::input("x").to_string().contains("input error:"));
    assert!(InkError::config("x").to_string().contains("config error:"));
    assert!(
        InkError::build_failure("x")
            .to_string()
            .contains("build failure:")
    );
    assert!(
        InkError::sequence_empty("x")
            .to_string()
            .contains("sequence empty:")
    );
    assert!(
        InkError::concurrency("x")
            .to_string()
            .contains("concurrency error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = InkError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_build_and_wait_failures_are_transient() {
    assert!(InkError::concurrency("wait").is_transient());
    assert!(InkError::build_failure("disk").is_transient());
    assert!(!InkError::input("bad").is_transient());
    assert!(!InkError::sequence_empty("none").is_transient());
}

#[test]
fn sqlite_errors_wrap_into_other() {
    let err = InkError::from(rusqlite::Error::QueryReturnedNoRows);
    assert!(matches!(err, InkError::Other(_)));
}

#[test]
fn duplicate_keeps_variant_and_message() {
    let e = InkError::build_failure("disk full").duplicate();
    assert!(matches!(&e, InkError::BuildFailure(m) if m == "disk full"));

    let other = InkError::Other(anyhow::anyhow!("inner").context("outer"));
    let copy = other.duplicate();
    assert!(copy.to_string().contains("outer"));
    assert!(copy.to_string().contains("inner"));
}
