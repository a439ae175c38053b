//! Connection graph: keeping connector endpoints attached to their targets.
//!
//! Connections are soft. A connector stores only the target's id per endpoint;
//! the endpoint coordinate is re-derived by snapping it against the target
//! whenever the target changes geometry. Every geometry-changing operation in
//! this module cascades to dependent connectors before returning, so callers
//! never have to remember to propagate by hand.
//!
//! Operations return the ids of every shape whose geometry changed, which the
//! editor forwards to the host's redraw hook.

#[cfg(test)]
#[path = "graph_test.rs"]
mod graph_test;

use tracing::debug;

use crate::drawing::Drawing;
use crate::geom::Point;
use crate::shape::{Connection, Endpoint, PathStyle, ResizeHandle, Routing, ShapeId};
use crate::snap::{self, Snap, SnapOptions};

impl Drawing {
    /// Pin `endpoint` of connector `id` to `target`, replacing any previous
    /// attachment of that endpoint.
    ///
    /// Returns false when `id` is not a connector or `target` is not a live
    /// snap target.
    pub fn set_connection(&mut self, id: ShapeId, endpoint: Endpoint, target: ShapeId) -> bool {
        if id == target || !self.get(target).is_some_and(|t| t.is_snap_target()) {
            return false;
        }
        let Some(c) = self.get_mut(id).and_then(|s| s.connector_mut()) else {
            return false;
        };
        c.links.set(endpoint, Some(target));
        debug!(id, ?endpoint, target, "connection set");
        true
    }

    /// Detach `endpoint` of connector `id`. Returns false when `id` is not a connector.
    pub fn clear_connection(&mut self, id: ShapeId, endpoint: Endpoint) -> bool {
        let Some(c) = self.get_mut(id).and_then(|s| s.connector_mut()) else {
            return false;
        };
        c.links.set(endpoint, None);
        true
    }

    /// Where `connection` of connector `connector_id` should sit now.
    ///
    /// Snaps the connector's current endpoint against the single target shape,
    /// with no distance limit: an existing attachment always lands on the
    /// target's nearest anchor. Returns `None` when the connector or the target
    /// is gone, in which case the stored coordinate stays authoritative.
    #[must_use]
    pub fn resolve_connection_point(&self, connector_id: ShapeId, connection: Connection) -> Option<Point> {
        let from = self.get(connector_id)?.endpoint(connection.endpoint)?;
        let target = self.get(connection.target_id)?;
        let snapped = snap::find_snap_point(from, [target], Some(connector_id), f64::INFINITY);
        Some(snapped.point)
    }

    /// Connectors with at least one endpoint attached to `target`.
    #[must_use]
    pub fn dependents(&self, target: ShapeId) -> Vec<ShapeId> {
        self.iter()
            .filter(|s| s.links().is_some_and(|l| l.references(target)))
            .map(|s| s.id)
            .collect()
    }

    /// Re-resolve every endpoint attached to `moved` and write it back.
    ///
    /// Returns the connectors that were updated.
    pub fn propagate_move(&mut self, moved: ShapeId) -> Vec<ShapeId> {
        let updates = self.resolve_where(|c| c.target_id == moved);
        self.apply_updates(updates)
    }

    /// Re-derive every connector endpoint from its target's current geometry.
    ///
    /// Used after bulk loads and history restores, where stored coordinates may
    /// predate the target's last move. Stale connections are skipped.
    pub fn rebuild(&mut self) -> Vec<ShapeId> {
        let updates = self.resolve_where(|_| true);
        let touched = self.apply_updates(updates);
        debug!(connectors = touched.len(), "connections rebuilt");
        touched
    }

    /// Translate a shape by `(dx, dy)` and carry attached endpoints along.
    ///
    /// Moving a connector as a whole detaches it from its targets. Returns
    /// every shape whose geometry changed, the moved shape first; empty for
    /// unknown ids.
    pub fn move_shape(&mut self, id: ShapeId, dx: f64, dy: f64) -> Vec<ShapeId> {
        let Some(shape) = self.get_mut(id) else {
            return Vec::new();
        };
        shape.translate(dx, dy);
        if let Some(c) = shape.connector_mut() {
            c.links.clear();
            return vec![id];
        }

        // Shift attached endpoints first so they re-snap to the same anchor.
        for s in &mut self.shapes {
            if let Some(c) = s.connector_mut() {
                for endpoint in Endpoint::BOTH {
                    if c.links.get(endpoint) == Some(id) {
                        let p = c.endpoint(endpoint).offset(dx, dy);
                        c.set_endpoint(endpoint, p);
                    }
                }
            }
        }

        let mut touched = vec![id];
        touched.extend(self.propagate_move(id));
        touched
    }

    /// Resize an outline by dragging `handle` to `to`, then cascade.
    ///
    /// Returns an empty list when the shape is unknown or not resizable.
    pub fn resize_shape(&mut self, id: ShapeId, handle: ResizeHandle, to: Point) -> Vec<ShapeId> {
        let resized = self.get_mut(id).is_some_and(|s| s.resize(handle, to));
        if !resized {
            return Vec::new();
        }
        let mut touched = vec![id];
        touched.extend(self.propagate_move(id));
        touched
    }

    /// Overwrite a shape's `(x1, y1)` / `(x2, y2)` pair, then cascade.
    ///
    /// For connectors, an endpoint whose coordinate changes is detached.
    pub fn set_corners(&mut self, id: ShapeId, p1: Point, p2: Point) -> Vec<ShapeId> {
        let Some(shape) = self.get_mut(id) else {
            return Vec::new();
        };
        let (old1, old2) = shape.corners();
        shape.set_corners(p1, p2);
        if let Some(c) = shape.connector_mut() {
            if old1 != p1 {
                c.links.set(Endpoint::Start, None);
            }
            if old2 != p2 {
                c.links.set(Endpoint::End, None);
            }
            return vec![id];
        }
        let mut touched = vec![id];
        touched.extend(self.propagate_move(id));
        touched
    }

    /// Drop a connector endpoint at `point`, attaching it to whatever it snaps to.
    ///
    /// The endpoint is written to the snapped coordinate and its connection is
    /// set to the matched shape, or cleared when nothing matched. Returns
    /// `None` when `id` is not a connector.
    pub fn attach_endpoint(&mut self, id: ShapeId, endpoint: Endpoint, point: Point, opts: SnapOptions) -> Option<Snap> {
        if !self.get(id)?.is_connector() {
            return None;
        }
        let snapped = opts.resolve(point, self.iter(), Some(id));
        let c = self.get_mut(id)?.connector_mut()?;
        c.set_endpoint(endpoint, snapped.point);
        c.links.set(endpoint, snapped.target);
        debug!(id, ?endpoint, target = ?snapped.target, "endpoint dropped");
        Some(snapped)
    }

    /// Move interior waypoint `index` of an orthogonal connector.
    pub fn move_waypoint(&mut self, id: ShapeId, index: usize, to: Point) -> bool {
        let Some(c) = self.get_mut(id).and_then(|s| s.connector_mut()) else {
            return false;
        };
        let PathStyle::Orthogonal { waypoints, .. } = &mut c.path else {
            return false;
        };
        let Some(wp) = waypoints.get_mut(index) else {
            return false;
        };
        *wp = to;
        true
    }

    /// Toggle an orthogonal connector between horizontal-first and vertical-first.
    ///
    /// Returns the new routing, or `None` for anything that is not orthogonal.
    pub fn flip_routing(&mut self, id: ShapeId) -> Option<Routing> {
        let c = self.get_mut(id)?.connector_mut()?;
        let PathStyle::Orthogonal { routing, .. } = &mut c.path else {
            return None;
        };
        *routing = routing.flipped();
        Some(*routing)
    }

    /// Resolve every connection matching `filter` without mutating anything.
    fn resolve_where(&self, filter: impl Fn(&Connection) -> bool) -> Vec<(ShapeId, Endpoint, Point)> {
        let mut updates = Vec::new();
        for shape in self.iter() {
            let Some(links) = shape.links() else {
                continue;
            };
            for conn in links.iter().filter(|c| filter(c)) {
                match self.resolve_connection_point(shape.id, conn) {
                    Some(p) => updates.push((shape.id, conn.endpoint, p)),
                    None => debug!(id = shape.id, target = conn.target_id, "stale connection skipped"),
                }
            }
        }
        updates
    }

    fn apply_updates(&mut self, updates: Vec<(ShapeId, Endpoint, Point)>) -> Vec<ShapeId> {
        let mut touched: Vec<ShapeId> = Vec::new();
        for (id, endpoint, p) in updates {
            if let Some(c) = self.get_mut(id).and_then(|s| s.connector_mut()) {
                c.set_endpoint(endpoint, p);
                if !touched.contains(&id) {
                    touched.push(id);
                }
            }
        }
        touched
    }
}
