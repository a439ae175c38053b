//! The editing façade hosts drive.
//!
//! [`Editor`] owns the drawing, its history, the configuration and a clipboard.
//! Every mutating call follows the same shape: validate, record the
//! pre-edit state, mutate through the cascading `Drawing` primitives, then
//! report each affected shape to the host's [`Redraw`] sink. Calls that would
//! not change anything return early without touching the history, so a
//! rejected edit never leaves an empty undo step behind.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use tracing::debug;

use crate::config::EditorConfig;
use crate::drawing::Drawing;
use crate::geom::Point;
use crate::history::History;
use crate::persist::{LoadError, SaveError};
use crate::shape::{Endpoint, Geometry, ResizeHandle, Routing, Shape, ShapeId, Style};
use crate::snap::Snap;

/// Host callback for shapes that need repainting.
///
/// Called once per affected shape, including shapes that were just removed.
pub trait Redraw {
    fn invalidate(&mut self, id: ShapeId);
}

impl<F: FnMut(ShapeId)> Redraw for F {
    fn invalidate(&mut self, id: ShapeId) {
        self(id);
    }
}

/// Redraw sink for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedraw;

impl Redraw for NoRedraw {
    fn invalidate(&mut self, _id: ShapeId) {}
}

pub struct Editor<R: Redraw = NoRedraw> {
    drawing: Drawing,
    history: History,
    config: EditorConfig,
    clipboard: Option<Shape>,
    redraw: R,
}

impl Default for Editor<NoRedraw> {
    fn default() -> Self {
        Self::new(EditorConfig::default(), NoRedraw)
    }
}

impl<R: Redraw> Editor<R> {
    #[must_use]
    pub fn new(config: EditorConfig, redraw: R) -> Self {
        Self {
            drawing: Drawing::new(),
            history: History::with_depth(config.history_depth),
            config,
            clipboard: None,
            redraw,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn redraw(&self) -> &R {
        &self.redraw
    }

    /// The shape waiting to be pasted, if any.
    #[must_use]
    pub fn clipboard(&self) -> Option<&Shape> {
        self.clipboard.as_ref()
    }

    // --- Shapes ---

    /// Insert a new shape on top and return its id.
    pub fn add_shape(&mut self, shape: Shape) -> ShapeId {
        self.checkpoint();
        let id = self.drawing.insert(shape);
        self.notify([id]);
        id
    }

    /// Delete a shape, detaching connectors that pointed at it.
    pub fn delete_shape(&mut self, id: ShapeId) -> bool {
        if !self.drawing.contains(id) {
            return false;
        }
        self.checkpoint();
        let detached = self.drawing.dependents(id);
        self.drawing.delete(id);
        debug!(id, detached = detached.len(), "editor delete");
        self.notify(std::iter::once(id).chain(detached));
        true
    }

    /// Translate a shape and everything attached to it.
    pub fn move_shape(&mut self, id: ShapeId, dx: f64, dy: f64) -> Vec<ShapeId> {
        if !self.drawing.contains(id) {
            return Vec::new();
        }
        self.checkpoint();
        self.drag_shape(id, dx, dy)
    }

    /// [`move_shape`](Self::move_shape) without a history entry.
    ///
    /// For hosts that stream pointer motion: call [`checkpoint`](Self::checkpoint)
    /// once on press, then drag freely so the whole gesture undoes as one step.
    pub fn drag_shape(&mut self, id: ShapeId, dx: f64, dy: f64) -> Vec<ShapeId> {
        let touched = self.drawing.move_shape(id, dx, dy);
        self.notify(touched.iter().copied());
        touched
    }

    /// Resize an outline by one of its corner handles.
    pub fn resize_shape(&mut self, id: ShapeId, handle: ResizeHandle, to: Point) -> Vec<ShapeId> {
        if !self.drawing.get(id).is_some_and(|s| s.outline_geometry().is_some()) {
            return Vec::new();
        }
        self.checkpoint();
        let touched = self.drawing.resize_shape(id, handle, to);
        self.notify(touched.iter().copied());
        touched
    }

    // --- Connectors ---

    /// Drop a connector endpoint at `to`.
    ///
    /// The endpoint attaches to the nearest anchor within the snap threshold,
    /// otherwise it detaches and lands on the grid (when enabled) or on `to`.
    pub fn move_endpoint(&mut self, id: ShapeId, endpoint: Endpoint, to: Point) -> Option<Snap> {
        if !self.drawing.get(id).is_some_and(Shape::is_connector) {
            return None;
        }
        self.checkpoint();
        let snap = self.drawing.attach_endpoint(id, endpoint, to, self.config.snap_options());
        self.notify([id]);
        snap
    }

    /// Move an interior waypoint of an orthogonal connector, grid-snapped.
    pub fn move_waypoint(&mut self, id: ShapeId, index: usize, to: Point) -> bool {
        let exists = self.drawing.get(id).and_then(Shape::connector).is_some_and(|c| index < c.waypoints().len());
        if !exists {
            return false;
        }
        self.checkpoint();
        let to = self.config.snap_options().to_grid(to);
        let moved = self.drawing.move_waypoint(id, index, to);
        self.notify([id]);
        moved
    }

    /// Swap an orthogonal connector between horizontal-first and vertical-first.
    pub fn flip_routing(&mut self, id: ShapeId) -> Option<Routing> {
        self.drawing.get(id)?.connector()?.routing()?;
        self.checkpoint();
        let routing = self.drawing.flip_routing(id);
        self.notify([id]);
        routing
    }

    // --- Attributes ---

    /// Set or clear a shape's label.
    pub fn set_label(&mut self, id: ShapeId, label: Option<String>) -> bool {
        self.edit(id, |shape| shape.label = label)
    }

    /// Move a shape's label to `offset` from the shape's centre.
    pub fn move_label(&mut self, id: ShapeId, offset: Point) -> bool {
        self.edit(id, |shape| shape.label_offset = offset)
    }

    /// Replace the content of a text shape.
    pub fn set_text(&mut self, id: ShapeId, text: impl Into<String>) -> bool {
        if !self.drawing.get(id).is_some_and(|s| matches!(s.geometry, Geometry::Text(_))) {
            return false;
        }
        let text = text.into();
        self.edit(id, |shape| {
            if let Geometry::Text(t) = &mut shape.geometry {
                t.text = text;
            }
        })
    }

    pub fn set_style(&mut self, id: ShapeId, style: Style) -> bool {
        self.edit(id, |shape| shape.style = style)
    }

    // --- Z-order ---

    pub fn bring_to_front(&mut self, id: ShapeId) -> bool {
        if !self.drawing.contains(id) {
            return false;
        }
        self.checkpoint();
        let moved = self.drawing.bring_to_front(id);
        self.notify([id]);
        moved
    }

    pub fn send_to_back(&mut self, id: ShapeId) -> bool {
        if !self.drawing.contains(id) {
            return false;
        }
        self.checkpoint();
        let moved = self.drawing.send_to_back(id);
        self.notify([id]);
        moved
    }

    // --- Clipboard ---

    /// Put a detached copy of `id` on the clipboard.
    pub fn copy(&mut self, id: ShapeId) -> bool {
        let Some(shape) = self.drawing.get(id) else {
            return false;
        };
        self.clipboard = Some(shape.clone_offset(0.0, 0.0));
        true
    }

    /// Insert the clipboard shape shifted by the paste offset.
    ///
    /// The clipboard follows the pasted copy, so repeated pastes cascade
    /// diagonally instead of stacking.
    pub fn paste(&mut self) -> Option<ShapeId> {
        let offset = self.config.paste_offset;
        let copy = self.clipboard.as_ref()?.clone_offset(offset, offset);
        self.clipboard = Some(copy.clone());
        Some(self.add_shape(copy))
    }

    // --- Whole drawing ---

    /// Remove every shape. An already empty drawing records nothing.
    pub fn clear(&mut self) -> bool {
        if self.drawing.is_empty() {
            return false;
        }
        self.checkpoint();
        let removed: Vec<ShapeId> = self.drawing.iter().map(|s| s.id).collect();
        self.drawing.clear();
        self.notify(removed);
        true
    }

    pub fn undo(&mut self) -> bool {
        let before = self.ids();
        if !self.history.undo(&mut self.drawing) {
            return false;
        }
        self.notify_union(before);
        true
    }

    pub fn redo(&mut self) -> bool {
        let before = self.ids();
        if !self.history.redo(&mut self.drawing) {
            return false;
        }
        self.notify_union(before);
        true
    }

    /// Record the current state as an undo step.
    pub fn checkpoint(&mut self) {
        self.history.record(&self.drawing);
    }

    /// Replace the drawing with the contents of a drawing file.
    ///
    /// History is reset; a failed load leaves the current drawing untouched.
    pub fn load_json(&mut self, json: &str) -> Result<(), LoadError> {
        let loaded = Drawing::from_json(json)?;
        let before = self.ids();
        self.drawing = loaded;
        self.history.clear();
        self.notify_union(before);
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        self.drawing.to_json()
    }

    // --- Internals ---

    /// Apply `f` to shape `id`, recording and notifying only when the shape
    /// actually changed. False for unknown ids.
    fn edit(&mut self, id: ShapeId, f: impl FnOnce(&mut Shape)) -> bool {
        let Some(current) = self.drawing.get(id) else {
            return false;
        };
        let mut updated = current.clone();
        f(&mut updated);
        if updated == *current {
            return true;
        }
        self.checkpoint();
        if let Some(shape) = self.drawing.get_mut(id) {
            *shape = updated;
        }
        self.notify([id]);
        true
    }

    fn ids(&self) -> Vec<ShapeId> {
        self.drawing.iter().map(|s| s.id).collect()
    }

    /// Notify every id in `before` plus every id now present.
    fn notify_union(&mut self, mut before: Vec<ShapeId>) {
        for id in self.ids() {
            if !before.contains(&id) {
                before.push(id);
            }
        }
        self.notify(before);
    }

    fn notify(&mut self, ids: impl IntoIterator<Item = ShapeId>) {
        for id in ids {
            self.redraw.invalidate(id);
        }
    }
}
