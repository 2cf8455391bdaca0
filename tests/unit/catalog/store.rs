use super::*;

#[test]
fn schema_applies_twice_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("index.db");
    drop(Catalog::open(&path).unwrap());
    let reopened = Catalog::open(&path).unwrap();
    assert_eq!(reopened.rotation_len().unwrap(), 0);
}

#[test]
fn foreign_keys_are_enforced() {
    let catalog = Catalog::open_in_memory().unwrap();
    let conn = catalog.lock().unwrap();
    let on: i64 = conn
        .query_row("PRAGMA foreign_keys", [], |r| r.get(0))
        .unwrap();
    assert_eq!(on, 1);
}
