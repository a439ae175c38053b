//! The drawing: the ordered set of live shapes and the id counter.
//!
//! `Drawing` exclusively owns every [`Shape`]. Sequence order is z-order, back
//! to front, so appended shapes render on top. Connections between shapes are
//! weak references by id (see `graph`), so removing a shape never leaves a
//! dangling pointer, only a detached endpoint.
//!
//! A `Drawing` is also the unit the history snapshots and the persistence
//! boundary serializes.

#[cfg(test)]
#[path = "drawing_test.rs"]
mod drawing_test;

use tracing::debug;

use crate::consts::MAX_SHAPE_ID;
use crate::shape::{Shape, ShapeId, UNASSIGNED};

/// Ordered collection of shapes plus the next id to hand out.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub(crate) shapes: Vec<Shape>,
    pub(crate) next_id: ShapeId,
}

impl Drawing {
    /// Create an empty drawing. The first inserted shape gets id 1.
    #[must_use]
    pub fn new() -> Self {
        Self { shapes: Vec::new(), next_id: 1 }
    }

    /// Insert a shape on top of the stack, assigning an id if it has none.
    ///
    /// Shapes arriving with an explicit id keep it, and the counter moves past
    /// it so later assignments never collide. An explicit id that is already
    /// live or above [`MAX_SHAPE_ID`] is treated as unassigned.
    pub fn insert(&mut self, mut shape: Shape) -> ShapeId {
        if shape.id != UNASSIGNED && (shape.id > MAX_SHAPE_ID || self.contains(shape.id)) {
            debug!(id = shape.id, "explicit id unavailable, reassigning");
            shape.id = UNASSIGNED;
        }
        if shape.id == UNASSIGNED {
            shape.id = self.next_id;
            self.next_id = self.next_id.saturating_add(1);
        } else if shape.id >= self.next_id {
            self.next_id = shape.id + 1;
        }
        let id = shape.id;
        debug!(id, kind = ?shape.shape_type(), "shape inserted");
        self.shapes.push(shape);
        id
    }

    /// Remove a shape and detach every connector endpoint that pointed at it.
    ///
    /// Connectors lose the attachment but stay in the drawing. Unknown ids are
    /// a no-op and return `None`.
    pub fn delete(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.index_of(id)?;
        let removed = self.shapes.remove(index);
        let mut detached = 0usize;
        for shape in &mut self.shapes {
            if let Some(c) = shape.connector_mut() {
                if c.links.detach_target(id) {
                    detached += 1;
                }
            }
        }
        debug!(id, detached, "shape deleted");
        Some(removed)
    }

    /// Remove every shape and restart ids at 1.
    pub fn clear(&mut self) {
        self.shapes.clear();
        self.next_id = 1;
    }

    /// Look up a shape by id.
    #[must_use]
    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Mutable lookup. Geometry edits made through this handle do not cascade
    /// to connectors; prefer the `graph` operations for moves.
    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// Shapes in z-order, back to front.
    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }

    #[must_use]
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// The id the next unassigned insert will receive.
    #[must_use]
    pub fn next_id(&self) -> ShapeId {
        self.next_id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Position of a shape in the z-order.
    #[must_use]
    pub fn index_of(&self, id: ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| s.id == id)
    }

    /// Move a shape to the top of the stack. Returns false for unknown ids.
    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let shape = self.shapes.remove(index);
        self.shapes.push(shape);
        true
    }

    /// Move a shape to the bottom of the stack. Returns false for unknown ids.
    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let shape = self.shapes.remove(index);
        self.shapes.insert(0, shape);
        true
    }

    /// Replace the whole contents, as when restoring a snapshot.
    pub(crate) fn replace(&mut self, shapes: Vec<Shape>, next_id: ShapeId) {
        self.shapes = shapes;
        self.next_id = next_id;
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}
