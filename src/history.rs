//! Undo/redo history over whole-drawing snapshots.
//!
//! Each recorded entry is a deep copy of the shape sequence and id counter
//! taken *before* an edit. The undo stack is bounded (oldest entries fall
//! off the bottom); the redo stack is unbounded and cleared whenever a new
//! edit is recorded. Restoring a snapshot always re-derives connector
//! endpoints, since the snapshot may predate a target's last move.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use std::collections::VecDeque;

use tracing::info;

use crate::consts::HISTORY_DEPTH;
use crate::drawing::Drawing;
use crate::shape::{Shape, ShapeId};

/// Frozen copy of a drawing's contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub shapes: Vec<Shape>,
    pub next_id: ShapeId,
}

impl Snapshot {
    #[must_use]
    pub fn capture(drawing: &Drawing) -> Self {
        Self { shapes: drawing.shapes.clone(), next_id: drawing.next_id }
    }

    fn restore_into(self, drawing: &mut Drawing) {
        drawing.replace(self.shapes, self.next_id);
        drawing.rebuild();
    }
}

#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<Snapshot>,
    redo: Vec<Snapshot>,
    max_depth: usize,
}

impl History {
    #[must_use]
    pub fn new() -> Self {
        Self::with_depth(HISTORY_DEPTH)
    }

    /// History keeping at most `max_depth` undo entries.
    #[must_use]
    pub fn with_depth(max_depth: usize) -> Self {
        Self { undo: VecDeque::new(), redo: Vec::new(), max_depth }
    }

    /// Push the pre-edit state of `drawing` and invalidate the redo stack.
    pub fn record(&mut self, drawing: &Drawing) {
        self.undo.push_back(Snapshot::capture(drawing));
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Step back one edit. Returns false when there is nothing to undo.
    pub fn undo(&mut self, drawing: &mut Drawing) -> bool {
        let Some(previous) = self.undo.pop_back() else {
            return false;
        };
        self.redo.push(Snapshot::capture(drawing));
        previous.restore_into(drawing);
        info!(undo = self.undo.len(), redo = self.redo.len(), "undo");
        true
    }

    /// Re-apply the last undone edit. Returns false when there is nothing to redo.
    pub fn redo(&mut self, drawing: &mut Drawing) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        self.undo.push_back(Snapshot::capture(drawing));
        while self.undo.len() > self.max_depth {
            self.undo.pop_front();
        }
        next.restore_into(drawing);
        info!(undo = self.undo.len(), redo = self.redo.len(), "redo");
        true
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Forget every entry, as after loading a new drawing.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}
