//! Diagram-editing core: shapes, snapping connectors, orthogonal routing and
//! undo/redo.
//!
//! The crate has no rendering or input handling of its own. A host (GUI,
//! CLI, test harness) drives an [`editor::Editor`], which keeps connector
//! endpoints glued to the shapes they attach to and calls back into the
//! host's [`editor::Redraw`] sink for every shape that needs repainting.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`editor`] | Editing façade: history, cascades and redraw notification per edit |
//! | [`drawing`] | Ordered shape store, id allocation, cascading delete, z-order |
//! | [`graph`] | Connection set/clear/resolve, move propagation and rebuild |
//! | [`shape`] | Shape types, geometry, resize and clone-with-offset |
//! | [`snap`] | Anchor points, nearest-anchor search and grid snapping |
//! | [`route`] | Orthogonal (Manhattan) path routing |
//! | [`history`] | Bounded snapshot undo/redo |
//! | [`persist`] | JSON drawing files |
//! | [`config`] | Editor tunables and environment overrides |
//! | [`geom`] | Points and bounding boxes |
//! | [`consts`] | Shared numeric constants (snap threshold, history depth, etc.) |

pub mod config;
pub mod consts;
pub mod drawing;
pub mod editor;
pub mod geom;
pub mod graph;
pub mod history;
pub mod persist;
pub mod route;
pub mod shape;
pub mod snap;

pub use drawing::Drawing;
pub use editor::{Editor, NoRedraw, Redraw};
pub use geom::{Bounds, Point};
pub use shape::{Endpoint, Routing, Shape, ShapeId, ShapeType};
