#![allow(clippy::float_cmp)]

use super::*;
use crate::geom::Point;
use crate::shape::{Endpoint, Head, OutlineKind};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect() -> Shape {
    Shape::outline(OutlineKind::Rectangle, pt(0.0, 0.0), pt(100.0, 50.0))
}

// =============================================================
// record / undo / redo
// =============================================================

#[test]
fn empty_history_is_noop() {
    let mut h = History::new();
    let mut d = Drawing::new();
    d.insert(rect());
    let before = d.clone();

    assert!(!h.undo(&mut d));
    assert!(!h.redo(&mut d));
    assert_eq!(d, before);
    assert!(!h.can_undo());
    assert!(!h.can_redo());
}

#[test]
fn undo_then_redo_round_trips() {
    let mut h = History::new();
    let mut d = Drawing::new();
    let a = d.insert(rect());

    h.record(&d);
    d.move_shape(a, 40.0, 0.0);
    let after = d.clone();

    assert!(h.undo(&mut d));
    assert_eq!(d.get(a).unwrap().corners(), (pt(0.0, 0.0), pt(100.0, 50.0)));
    assert!(h.can_redo());

    assert!(h.redo(&mut d));
    assert_eq!(d, after);
    assert!(!h.can_redo());
    assert_eq!(h.undo_depth(), 1);
}

#[test]
fn undo_restores_id_counter() {
    let mut h = History::new();
    let mut d = Drawing::new();
    d.insert(rect());
    h.record(&d);
    d.insert(rect());
    assert_eq!(d.next_id(), 3);

    h.undo(&mut d);
    assert_eq!(d.len(), 1);
    assert_eq!(d.next_id(), 2);
}

#[test]
fn undo_of_delete_brings_connection_back() {
    let mut h = History::new();
    let mut d = Drawing::new();
    let a = d.insert(rect());
    let l = d.insert(Shape::straight(Head::Arrow, pt(100.0, 25.0), pt(300.0, 25.0)));
    d.set_connection(l, Endpoint::Start, a);

    h.record(&d);
    d.delete(a);
    assert_eq!(d.get(l).unwrap().links().unwrap().get(Endpoint::Start), None);

    h.undo(&mut d);
    assert_eq!(d.get(l).unwrap().links().unwrap().get(Endpoint::Start), Some(a));
}

#[test]
fn new_record_clears_redo() {
    let mut h = History::new();
    let mut d = Drawing::new();
    h.record(&d);
    d.insert(rect());
    h.undo(&mut d);
    assert_eq!(h.redo_depth(), 1);

    h.record(&d);
    assert_eq!(h.redo_depth(), 0);
    assert!(!h.redo(&mut d));
}

// =============================================================
// Bounds
// =============================================================

#[test]
fn depth_is_bounded_with_oldest_evicted() {
    let mut h = History::new();
    let mut d = Drawing::new();
    for _ in 0..60 {
        h.record(&d);
        d.insert(rect());
    }
    assert_eq!(h.undo_depth(), 50);

    while h.undo(&mut d) {}
    // The first ten pre-edit states fell off the bottom.
    assert_eq!(d.len(), 10);
}

#[test]
fn custom_depth() {
    let mut h = History::with_depth(2);
    let d = Drawing::new();
    for _ in 0..5 {
        h.record(&d);
    }
    assert_eq!(h.undo_depth(), 2);
    assert_eq!(h.max_depth(), 2);
}

#[test]
fn clear_drops_both_stacks() {
    let mut h = History::new();
    let mut d = Drawing::new();
    h.record(&d);
    h.record(&d);
    h.undo(&mut d);
    h.clear();
    assert_eq!(h.undo_depth(), 0);
    assert_eq!(h.redo_depth(), 0);
}
