//! Snap engine: nearest attachment point within a threshold.
//!
//! Every snap target exposes a fixed set of anchor points (corners, edge
//! midpoints, cardinal extrema). A query scans every anchor of every eligible
//! shape and keeps the global minimum. There is no spatial index; drawings are
//! small and queries only happen on interactive endpoint drags.

#[cfg(test)]
#[path = "snap_test.rs"]
mod snap_test;

use crate::consts::SNAP_THRESHOLD;
use crate::geom::Point;
use crate::shape::{Geometry, OutlineKind, Shape, ShapeId};

/// Outcome of a snap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snap {
    /// The matched anchor, or the query point when nothing was close enough.
    pub point: Point,
    /// Shape owning the matched anchor.
    pub target: Option<ShapeId>,
}

impl Snap {
    /// A query that matched nothing.
    #[must_use]
    pub fn free(point: Point) -> Self {
        Self { point, target: None }
    }
}

/// Anchor points a connector endpoint may attach to on `shape`.
///
/// Connectors and text have none.
#[must_use]
pub fn anchor_points(shape: &Shape) -> Vec<Point> {
    let Geometry::Outline(o) = &shape.geometry else {
        return Vec::new();
    };
    let (x1, y1, x2, y2) = (o.p1.x, o.p1.y, o.p2.x, o.p2.y);
    let cx = (x1 + x2) / 2.0;
    let cy = (y1 + y2) / 2.0;
    match o.kind {
        OutlineKind::Rectangle | OutlineKind::Square => vec![
            Point::new(x1, y1),
            Point::new(x2, y1),
            Point::new(x1, y2),
            Point::new(x2, y2),
            Point::new(cx, y1),
            Point::new(cx, y2),
            Point::new(x1, cy),
            Point::new(x2, cy),
        ],
        OutlineKind::Circle | OutlineKind::Ellipse => {
            let rx = (x2 - x1).abs() / 2.0;
            let ry = (y2 - y1).abs() / 2.0;
            vec![
                Point::new(cx - rx, cy),
                Point::new(cx + rx, cy),
                Point::new(cx, cy - ry),
                Point::new(cx, cy + ry),
            ]
        }
        OutlineKind::Triangle => vec![Point::new(cx, y1), Point::new(x1, y2), Point::new(x2, y2)],
    }
}

/// Find the anchor nearest to `point` among `candidates`.
///
/// `exclude` (typically the connector being dragged) and every connector are
/// skipped. A match must be strictly closer than `threshold`; ties keep the
/// first anchor encountered in iteration order.
pub fn find_snap_point<'a, I>(point: Point, candidates: I, exclude: Option<ShapeId>, threshold: f64) -> Snap
where
    I: IntoIterator<Item = &'a Shape>,
{
    let mut best = Snap::free(point);
    let mut best_dist = threshold;

    for shape in candidates {
        if Some(shape.id) == exclude || !shape.is_snap_target() {
            continue;
        }
        for anchor in anchor_points(shape) {
            let dist = point.distance(anchor);
            if dist < best_dist {
                best_dist = dist;
                best = Snap { point: anchor, target: Some(shape.id) };
            }
        }
    }
    best
}

/// Round `point` to the nearest intersection of a square grid.
///
/// Non-positive spacing leaves the point unchanged.
#[must_use]
pub fn snap_to_grid(point: Point, spacing: f64) -> Point {
    if spacing <= 0.0 {
        return point;
    }
    Point::new((point.x / spacing).round() * spacing, (point.y / spacing).round() * spacing)
}

/// How a dropped endpoint resolves: shape anchors first, then the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    /// Exclusive distance limit for attaching to an anchor.
    pub threshold: f64,
    /// Grid spacing used when no anchor matched; `None` disables the grid.
    pub grid_spacing: Option<f64>,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self { threshold: SNAP_THRESHOLD, grid_spacing: None }
    }
}

impl SnapOptions {
    /// Snap `point` to the nearest anchor among `candidates`, falling back to
    /// the grid when nothing is within the threshold.
    pub fn resolve<'a, I>(&self, point: Point, candidates: I, exclude: Option<ShapeId>) -> Snap
    where
        I: IntoIterator<Item = &'a Shape>,
    {
        let snapped = find_snap_point(point, candidates, exclude, self.threshold);
        match (snapped.target, self.grid_spacing) {
            (None, Some(spacing)) => Snap::free(snap_to_grid(point, spacing)),
            _ => snapped,
        }
    }

    /// Grid-only snapping for points that never attach (waypoints, labels).
    #[must_use]
    pub fn to_grid(&self, point: Point) -> Point {
        self.grid_spacing.map_or(point, |spacing| snap_to_grid(point, spacing))
    }
}
