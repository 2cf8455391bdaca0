use super::*;

fn ids(names: &[&str]) -> Vec<SourceImageId> {
    names.iter().map(|n| SourceImageId::new(*n).unwrap()).collect()
}

fn sequencer(seed: u64) -> RotationSequencer {
    RotationSequencer::new(Arc::new(Catalog::open_in_memory().unwrap()), Some(seed))
}

#[test]
fn empty_rotation_is_sequence_empty() {
    let s = sequencer(1);
    assert!(matches!(s.next(None), Err(InkError::SequenceEmpty(_))));
}

#[test]
fn walking_from_none_visits_everything_then_wraps() {
    let s = sequencer(7);
    let all = ids(&["a", "b", "c", "d", "e"]);
    s.reconcile(&all).unwrap();

    let mut visited = Vec::new();
    let mut cur: Option<SourceImageId> = None;
    for _ in 0..all.len() {
        let next = s.next(cur.as_ref()).unwrap();
        visited.push(next.clone());
        cur = Some(next);
    }
    assert_eq!(visited, s.order().unwrap());
    assert_eq!(s.next(cur.as_ref()).unwrap(), visited[0]);
}

#[test]
fn unknown_current_restarts_from_first() {
    let s = sequencer(3);
    s.reconcile(&ids(&["a", "b"])).unwrap();
    let first = s.order().unwrap()[0].clone();
    let gone = SourceImageId::new("deleted").unwrap();
    assert_eq!(s.next(Some(&gone)).unwrap(), first);
}

#[test]
fn reconcile_keeps_relative_order_of_existing_entries() {
    let s = sequencer(11);
    s.reconcile(&ids(&["a", "b", "c", "d"])).unwrap();
    let before = s.order().unwrap();

    let report = s
        .reconcile(&ids(&["a", "b", "c", "d", "x", "y", "z"]))
        .unwrap();
    assert_eq!(report.inserted, ids(&["x", "y", "z"]));
    assert!(report.removed.is_empty());

    let after = s.order().unwrap();
    assert_eq!(after.len(), 7);
    let survivors: Vec<_> = after.iter().filter(|id| before.contains(id)).cloned().collect();
    assert_eq!(survivors, before);
}

#[test]
fn reconcile_removes_vanished_ids_and_is_idempotent() {
    let s = sequencer(5);
    s.reconcile(&ids(&["a", "b", "c"])).unwrap();
    let report = s.reconcile(&ids(&["a", "c"])).unwrap();
    assert_eq!(report.removed, ids(&["b"]));
    assert!(s.reconcile(&ids(&["a", "c"])).unwrap().is_noop());

    let mut order = s.order().unwrap();
    order.sort();
    assert_eq!(order, ids(&["a", "c"]));
}

#[test]
fn same_seed_gives_same_order() {
    let names = ids(&["a", "b", "c", "d", "e", "f", "g", "h"]);
    let one = sequencer(42);
    let two = sequencer(42);
    one.reconcile(&names).unwrap();
    two.reconcile(&names).unwrap();
    assert_eq!(one.order().unwrap(), two.order().unwrap());
}

#[test]
fn shuffle_replaces_order_with_permutation() {
    let s = sequencer(9);
    let names = ids(&["a", "b", "c", "d", "a"]);
    s.shuffle(&names).unwrap();
    let mut order = s.order().unwrap();
    assert_eq!(order.len(), 4);
    order.sort();
    assert_eq!(order, ids(&["a", "b", "c", "d"]));
}
