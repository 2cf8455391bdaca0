use super::*;

fn id(s: &str) -> SourceImageId {
    SourceImageId::new(s).unwrap()
}

fn order(c: &Catalog) -> Vec<String> {
    c.rotation_entries()
        .unwrap()
        .into_iter()
        .map(|e| e.source_image_id.as_str().to_string())
        .collect()
}

#[test]
fn insert_at_rank_shifts_tail_and_keeps_relative_order() {
    let c = Catalog::open_in_memory().unwrap();
    c.rotation_replace(&[id("a"), id("b"), id("c")]).unwrap();

    let pos = c.rotation_insert_at_rank(&id("x"), 1).unwrap();
    assert_eq!(pos, 1);
    assert_eq!(order(&c), vec!["a", "x", "b", "c"]);

    c.rotation_insert_at_rank(&id("y"), 0).unwrap();
    assert_eq!(order(&c), vec!["y", "a", "x", "b", "c"]);

    c.rotation_insert_at_rank(&id("z"), 99).unwrap();
    assert_eq!(order(&c), vec!["y", "a", "x", "b", "c", "z"]);

    let positions: Vec<i64> = c.rotation_entries().unwrap().iter().map(|e| e.position).collect();
    let mut sorted = positions.clone();
    sorted.dedup();
    assert_eq!(positions, sorted);
}

#[test]
fn insert_into_empty_rotation_starts_at_zero() {
    let c = Catalog::open_in_memory().unwrap();
    assert_eq!(c.rotation_insert_at_rank(&id("a"), 0).unwrap(), 0);
    assert_eq!(c.rotation_first().unwrap().unwrap().source_image_id, id("a"));
}

#[test]
fn next_walks_forward_and_wraps() {
    let c = Catalog::open_in_memory().unwrap();
    assert!(c.rotation_next(None).unwrap().is_none());

    c.rotation_replace(&[id("a"), id("b")]).unwrap();
    let next = |cur: Option<&str>| {
        let cur = cur.map(id);
        c.rotation_next(cur.as_ref())
            .unwrap()
            .unwrap()
            .source_image_id
    };
    assert_eq!(next(None), id("a"));
    assert_eq!(next(Some("a")), id("b"));
    assert_eq!(next(Some("b")), id("a"));
    assert_eq!(next(Some("gone")), id("a"));
    assert_eq!(c.rotation_entry_for(&id("b")).unwrap().unwrap().position, 1);
}

#[test]
fn retain_drops_missing_ids() {
    let c = Catalog::open_in_memory().unwrap();
    c.rotation_replace(&[id("a"), id("b"), id("c")]).unwrap();
    let keep: HashSet<_> = [id("a"), id("c")].into_iter().collect();
    let removed = c.rotation_retain(&keep).unwrap();
    assert_eq!(removed, vec![id("b")]);
    assert_eq!(order(&c), vec!["a", "c"]);
    assert_eq!(c.rotation_len().unwrap(), 2);
}

#[test]
fn duplicate_id_is_rejected() {
    let c = Catalog::open_in_memory().unwrap();
    c.rotation_insert_at_rank(&id("a"), 0).unwrap();
    assert!(c.rotation_insert_at_rank(&id("a"), 0).is_err());
    assert_eq!(order(&c), vec!["a"]);
}
