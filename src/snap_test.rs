#![allow(clippy::float_cmp)]

use proptest::prelude::*;

use super::*;
use crate::consts::SNAP_THRESHOLD;
use crate::shape::{Font, Head};

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn with_id(mut shape: Shape, id: ShapeId) -> Shape {
    shape.id = id;
    shape
}

fn rect(id: ShapeId, x1: f64, y1: f64, x2: f64, y2: f64) -> Shape {
    with_id(Shape::outline(OutlineKind::Rectangle, pt(x1, y1), pt(x2, y2)), id)
}

// =============================================================
// anchor_points
// =============================================================

#[test]
fn rectangle_has_corners_and_midpoints() {
    let anchors = anchor_points(&rect(1, 0.0, 0.0, 100.0, 50.0));
    assert_eq!(anchors.len(), 8);
    for p in [pt(0.0, 0.0), pt(100.0, 0.0), pt(0.0, 50.0), pt(100.0, 50.0)] {
        assert!(anchors.contains(&p), "missing corner {p:?}");
    }
    for p in [pt(50.0, 0.0), pt(50.0, 50.0), pt(0.0, 25.0), pt(100.0, 25.0)] {
        assert!(anchors.contains(&p), "missing midpoint {p:?}");
    }
}

#[test]
fn ellipse_has_cardinal_extrema() {
    let s = Shape::outline(OutlineKind::Ellipse, pt(0.0, 0.0), pt(80.0, 40.0));
    assert_eq!(anchor_points(&s), vec![pt(0.0, 20.0), pt(80.0, 20.0), pt(40.0, 0.0), pt(40.0, 40.0)]);
}

#[test]
fn ellipse_anchors_ignore_corner_order() {
    let s = Shape::outline(OutlineKind::Ellipse, pt(80.0, 40.0), pt(0.0, 0.0));
    let anchors = anchor_points(&s);
    assert!(anchors.contains(&pt(0.0, 20.0)));
    assert!(anchors.contains(&pt(80.0, 20.0)));
}

#[test]
fn triangle_has_apex_and_base() {
    let s = Shape::outline(OutlineKind::Triangle, pt(0.0, 0.0), pt(60.0, 30.0));
    assert_eq!(anchor_points(&s), vec![pt(30.0, 0.0), pt(0.0, 30.0), pt(60.0, 30.0)]);
}

#[test]
fn connectors_and_text_have_no_anchors() {
    assert!(anchor_points(&Shape::straight(Head::Plain, pt(0.0, 0.0), pt(9.0, 9.0))).is_empty());
    assert!(anchor_points(&Shape::text(pt(0.0, 0.0), "x", Font::default())).is_empty());
}

// =============================================================
// find_snap_point
// =============================================================

#[test]
fn snaps_just_inside_threshold() {
    let shapes = [rect(1, 0.0, 0.0, 100.0, 100.0)];
    let snap = find_snap_point(pt(-14.9, 0.0), &shapes, None, SNAP_THRESHOLD);
    assert_eq!(snap.point, pt(0.0, 0.0));
    assert_eq!(snap.target, Some(1));
}

#[test]
fn does_not_snap_just_outside_threshold() {
    let shapes = [rect(1, 0.0, 0.0, 100.0, 100.0)];
    let snap = find_snap_point(pt(-15.1, 0.0), &shapes, None, SNAP_THRESHOLD);
    assert_eq!(snap, Snap::free(pt(-15.1, 0.0)));
}

#[test]
fn exact_threshold_distance_does_not_snap() {
    let shapes = [rect(1, 0.0, 0.0, 100.0, 100.0)];
    let snap = find_snap_point(pt(-15.0, 0.0), &shapes, None, SNAP_THRESHOLD);
    assert_eq!(snap.target, None);
}

#[test]
fn picks_global_minimum_across_shapes() {
    let shapes = [rect(1, 0.0, 0.0, 100.0, 100.0), rect(2, 105.0, 0.0, 200.0, 100.0)];
    let snap = find_snap_point(pt(103.0, 1.0), &shapes, None, SNAP_THRESHOLD);
    assert_eq!(snap.target, Some(2));
    assert_eq!(snap.point, pt(105.0, 0.0));
}

#[test]
fn ties_go_to_first_shape() {
    let shapes = [rect(1, 0.0, 0.0, 10.0, 10.0), rect(2, 0.0, 0.0, 10.0, 10.0)];
    let snap = find_snap_point(pt(1.0, 1.0), &shapes, None, SNAP_THRESHOLD);
    assert_eq!(snap.target, Some(1));
}

#[test]
fn excluded_shape_is_skipped() {
    let shapes = [rect(1, 0.0, 0.0, 10.0, 10.0), rect(2, 30.0, 0.0, 40.0, 10.0)];
    let snap = find_snap_point(pt(1.0, 1.0), &shapes, Some(1), SNAP_THRESHOLD);
    assert_eq!(snap.target, None);
}

#[test]
fn connectors_are_never_targets() {
    let line = with_id(Shape::straight(Head::Plain, pt(0.0, 0.0), pt(100.0, 0.0)), 1);
    let snap = find_snap_point(pt(0.0, 0.0), [&line], None, SNAP_THRESHOLD);
    assert_eq!(snap.target, None);
}

#[test]
fn empty_candidates_return_query() {
    let snap = find_snap_point(pt(3.0, 4.0), std::iter::empty(), None, SNAP_THRESHOLD);
    assert_eq!(snap, Snap::free(pt(3.0, 4.0)));
}

// =============================================================
// snap_to_grid
// =============================================================

#[test]
fn grid_rounds_to_nearest_intersection() {
    assert_eq!(snap_to_grid(pt(29.0, 31.0), 20.0), pt(20.0, 40.0));
    assert_eq!(snap_to_grid(pt(-11.0, 9.0), 20.0), pt(-20.0, 0.0));
}

#[test]
fn grid_with_zero_spacing_is_identity() {
    assert_eq!(snap_to_grid(pt(3.3, 4.4), 0.0), pt(3.3, 4.4));
}

// =============================================================
// SnapOptions
// =============================================================

#[test]
fn options_default_to_threshold_without_grid() {
    let opts = SnapOptions::default();
    assert_eq!(opts.threshold, SNAP_THRESHOLD);
    assert_eq!(opts.grid_spacing, None);
}

#[test]
fn options_prefer_anchor_over_grid() {
    let shapes = [rect(1, 3.0, 3.0, 50.0, 50.0)];
    let opts = SnapOptions { threshold: SNAP_THRESHOLD, grid_spacing: Some(20.0) };
    let snap = opts.resolve(pt(5.0, 5.0), &shapes, None);
    assert_eq!(snap.point, pt(3.0, 3.0));
    assert_eq!(snap.target, Some(1));
}

#[test]
fn options_fall_back_to_grid() {
    let shapes = [rect(1, 0.0, 0.0, 50.0, 50.0)];
    let opts = SnapOptions { threshold: SNAP_THRESHOLD, grid_spacing: Some(20.0) };
    let snap = opts.resolve(pt(118.0, 83.0), &shapes, None);
    assert_eq!(snap, Snap::free(pt(120.0, 80.0)));
}

#[test]
fn options_without_grid_return_query() {
    let opts = SnapOptions::default();
    assert_eq!(opts.resolve(pt(118.0, 83.0), std::iter::empty(), None), Snap::free(pt(118.0, 83.0)));
    assert_eq!(opts.to_grid(pt(118.0, 83.0)), pt(118.0, 83.0));
}

proptest! {
    #[test]
    fn snap_result_is_anchor_or_query(
        qx in -200.0f64..200.0,
        qy in -200.0f64..200.0,
        x2 in 1.0f64..150.0,
        y2 in 1.0f64..150.0,
    ) {
        let shape = rect(1, 0.0, 0.0, x2, y2);
        let query = pt(qx, qy);
        let snap = find_snap_point(query, [&shape], None, SNAP_THRESHOLD);
        match snap.target {
            Some(id) => {
                prop_assert_eq!(id, 1);
                prop_assert!(anchor_points(&shape).contains(&snap.point));
                prop_assert!(query.distance(snap.point) < SNAP_THRESHOLD);
            }
            None => {
                prop_assert_eq!(snap.point, query);
                for anchor in anchor_points(&shape) {
                    prop_assert!(query.distance(anchor) >= SNAP_THRESHOLD);
                }
            }
        }
    }
}
