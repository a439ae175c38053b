//! Orthogonal router: rectilinearize a polyline by inserting bends.
//!
//! The router is local and deterministic. Each non-aligned segment gets exactly
//! one bend, placed according to the connector's [`Routing`] policy. It does
//! not minimize bends globally or avoid other shapes.

#[cfg(test)]
#[path = "route_test.rs"]
mod route_test;

use crate::consts::ALIGN_TOLERANCE;
use crate::geom::Point;
use crate::shape::{Connector, PathStyle, Routing};

/// Turn `points` into a path whose consecutive points are all axis-aligned.
///
/// Fewer than two points are returned unchanged. Segments already aligned
/// within [`ALIGN_TOLERANCE`] on either axis are kept as-is.
#[must_use]
pub fn route_path(points: &[Point], routing: Routing) -> Vec<Point> {
    let Some((&first, rest)) = points.split_first() else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(points.len() * 2);
    out.push(first);
    let mut prev = first;
    for &curr in rest {
        let dx = (curr.x - prev.x).abs();
        let dy = (curr.y - prev.y).abs();
        if dx > ALIGN_TOLERANCE && dy > ALIGN_TOLERANCE {
            let bend = match routing {
                Routing::HorizontalFirst => Point::new(curr.x, prev.y),
                Routing::VerticalFirst => Point::new(prev.x, curr.y),
            };
            out.push(bend);
        }
        out.push(curr);
        prev = curr;
    }
    out
}

/// The renderable polyline of a connector.
///
/// Straight connectors yield their two endpoints. Orthogonal ones route
/// `start`, every waypoint, then `end`.
#[must_use]
pub fn connector_path(connector: &Connector) -> Vec<Point> {
    match &connector.path {
        PathStyle::Straight => vec![connector.start, connector.end],
        PathStyle::Orthogonal { waypoints, routing } => {
            let mut points = Vec::with_capacity(waypoints.len() + 2);
            points.push(connector.start);
            points.extend_from_slice(waypoints);
            points.push(connector.end);
            route_path(&points, *routing)
        }
    }
}
