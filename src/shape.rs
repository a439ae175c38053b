//! Shape model: every drawable entity and the connections between them.
//!
//! A [`Shape`] pairs a stable id and opaque presentation attributes with a
//! [`Geometry`], which is one of three families:
//!
//! - [`Connector`]: lines and arrows, straight or orthogonal. Only connectors
//!   carry waypoints, a routing policy, and [`Links`] to other shapes.
//! - [`Outline`]: closed shapes spanned by two opposite corners. These are the
//!   connection *targets*.
//! - [`TextBlock`]: a text anchor.
//!
//! The flat [`ShapeType`] discriminant is derived from the geometry and is what
//! goes on the wire (see `persist`).

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_RADIUS;
use crate::geom::{Bounds, Point};
use crate::persist::ShapeRecord;

/// Unique identifier for a shape within a drawing.
pub type ShapeId = u64;

/// Id carried by shapes that have not been inserted into a drawing yet.
pub const UNASSIGNED: ShapeId = 0;

/// Flat discriminant for every kind of shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeType {
    Line,
    Arrow,
    OrthoLine,
    OrthoArrow,
    Rectangle,
    Square,
    Circle,
    Ellipse,
    Triangle,
    Text,
}

impl ShapeType {
    /// Whether shapes of this type are connectors (line family).
    #[must_use]
    pub fn is_connector(self) -> bool {
        matches!(self, Self::Line | Self::Arrow | Self::OrthoLine | Self::OrthoArrow)
    }

    /// Whether shapes of this type route orthogonally.
    #[must_use]
    pub fn is_orthogonal(self) -> bool {
        matches!(self, Self::OrthoLine | Self::OrthoArrow)
    }
}

/// One end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// Both endpoints, start first.
    pub const BOTH: [Endpoint; 2] = [Endpoint::Start, Endpoint::End];
}

/// Bend policy for orthogonal connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Routing {
    /// Travel horizontally out of each point, then vertically.
    #[default]
    #[serde(rename = "h_first")]
    HorizontalFirst,
    /// Travel vertically out of each point, then horizontally.
    #[serde(rename = "v_first")]
    VerticalFirst,
}

impl Routing {
    /// The opposite policy.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::HorizontalFirst => Self::VerticalFirst,
            Self::VerticalFirst => Self::HorizontalFirst,
        }
    }
}

/// "This connector's `endpoint` is pinned to shape `target_id`."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub target_id: ShapeId,
    pub endpoint: Endpoint,
}

/// The connections of a connector: at most one target per endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Links {
    pub start: Option<ShapeId>,
    pub end: Option<ShapeId>,
}

impl Links {
    /// Target attached to `endpoint`, if any.
    #[must_use]
    pub fn get(&self, endpoint: Endpoint) -> Option<ShapeId> {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    /// Replace the target for `endpoint`. `None` detaches it.
    pub fn set(&mut self, endpoint: Endpoint, target: Option<ShapeId>) {
        match endpoint {
            Endpoint::Start => self.start = target,
            Endpoint::End => self.end = target,
        }
    }

    /// Detach every endpoint pointing at `target`. Returns true if anything changed.
    pub fn detach_target(&mut self, target: ShapeId) -> bool {
        let mut changed = false;
        for endpoint in Endpoint::BOTH {
            if self.get(endpoint) == Some(target) {
                self.set(endpoint, None);
                changed = true;
            }
        }
        changed
    }

    /// Whether any endpoint points at `target`.
    #[must_use]
    pub fn references(&self, target: ShapeId) -> bool {
        self.start == Some(target) || self.end == Some(target)
    }

    /// Live connections as records, start first.
    pub fn iter(&self) -> impl Iterator<Item = Connection> + '_ {
        Endpoint::BOTH
            .into_iter()
            .filter_map(|endpoint| self.get(endpoint).map(|target_id| Connection { target_id, endpoint }))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Decoration at the end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Head {
    #[default]
    Plain,
    Arrow,
}

/// How a connector travels from start to end.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PathStyle {
    /// A single straight segment.
    #[default]
    Straight,
    /// An axis-aligned path through `waypoints`.
    Orthogonal { waypoints: Vec<Point>, routing: Routing },
}

/// Line-family geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub start: Point,
    pub end: Point,
    pub head: Head,
    pub path: PathStyle,
    pub links: Links,
}

impl Connector {
    /// Coordinate of one endpoint.
    #[must_use]
    pub fn endpoint(&self, endpoint: Endpoint) -> Point {
        match endpoint {
            Endpoint::Start => self.start,
            Endpoint::End => self.end,
        }
    }

    pub fn set_endpoint(&mut self, endpoint: Endpoint, p: Point) {
        match endpoint {
            Endpoint::Start => self.start = p,
            Endpoint::End => self.end = p,
        }
    }

    /// Interior waypoints; always empty for straight connectors.
    #[must_use]
    pub fn waypoints(&self) -> &[Point] {
        match &self.path {
            PathStyle::Straight => &[],
            PathStyle::Orthogonal { waypoints, .. } => waypoints,
        }
    }

    /// Routing policy; `None` for straight connectors.
    #[must_use]
    pub fn routing(&self) -> Option<Routing> {
        match self.path {
            PathStyle::Straight => None,
            PathStyle::Orthogonal { routing, .. } => Some(routing),
        }
    }

    #[must_use]
    pub fn is_orthogonal(&self) -> bool {
        matches!(self.path, PathStyle::Orthogonal { .. })
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.start = self.start.offset(dx, dy);
        self.end = self.end.offset(dx, dy);
        if let PathStyle::Orthogonal { waypoints, .. } = &mut self.path {
            for wp in waypoints.iter_mut() {
                *wp = wp.offset(dx, dy);
            }
        }
    }
}

/// Closed shape kinds spanned by two corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineKind {
    Rectangle,
    Square,
    Circle,
    Ellipse,
    /// Isosceles: apex centred on the top edge, base spanning the full width.
    Triangle,
}

/// Closed-shape geometry. `p1` and `p2` are opposite corners in any order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub kind: OutlineKind,
    pub p1: Point,
    pub p2: Point,
}

/// Corner grabbed during a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeHandle {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Outline {
    /// Move the grabbed corner to `to`, keeping squares square and
    /// circles/ellipses centred.
    fn resize(&mut self, handle: ResizeHandle, to: Point) {
        match self.kind {
            OutlineKind::Circle => {
                let center = self.p1.midpoint(self.p2);
                let r = to.distance(center).max(MIN_RADIUS);
                self.p1 = center.offset(-r, -r);
                self.p2 = center.offset(r, r);
            }
            OutlineKind::Ellipse => {
                let center = self.p1.midpoint(self.p2);
                let rx = (to.x - center.x).abs().max(MIN_RADIUS);
                let ry = (to.y - center.y).abs().max(MIN_RADIUS);
                self.p1 = center.offset(-rx, -ry);
                self.p2 = center.offset(rx, ry);
            }
            OutlineKind::Square => {
                self.move_corner(handle, to);
                let size = (self.p2.x - self.p1.x).abs().max((self.p2.y - self.p1.y).abs());
                let sx = if self.p2.x > self.p1.x { size } else { -size };
                let sy = if self.p2.y > self.p1.y { size } else { -size };
                // The corner opposite the fixed one absorbs the squaring.
                match handle {
                    ResizeHandle::Se => {
                        self.p2.x = self.p1.x + sx;
                        self.p2.y = self.p1.y + sy;
                    }
                    ResizeHandle::Nw => {
                        self.p1.x = self.p2.x - sx;
                        self.p1.y = self.p2.y - sy;
                    }
                    ResizeHandle::Ne => {
                        self.p2.x = self.p1.x + sx;
                        self.p1.y = self.p2.y - sy;
                    }
                    ResizeHandle::Sw => {
                        self.p1.x = self.p2.x - sx;
                        self.p2.y = self.p1.y + sy;
                    }
                }
            }
            OutlineKind::Rectangle | OutlineKind::Triangle => self.move_corner(handle, to),
        }
    }

    fn move_corner(&mut self, handle: ResizeHandle, to: Point) {
        match handle {
            ResizeHandle::Nw => self.p1 = to,
            ResizeHandle::Ne => {
                self.p2.x = to.x;
                self.p1.y = to.y;
            }
            ResizeHandle::Sw => {
                self.p1.x = to.x;
                self.p2.y = to.y;
            }
            ResizeHandle::Se => self.p2 = to,
        }
    }
}

/// Font attributes of a text shape. Carried, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub family: String,
    pub size: u32,
    pub bold: bool,
    pub italic: bool,
    pub align: String,
}

impl Default for Font {
    fn default() -> Self {
        Self { family: "Arial".into(), size: 12, bold: false, italic: false, align: "left".into() }
    }
}

/// Text geometry: a single anchor point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub anchor: Point,
    pub text: String,
    pub font: Font,
}

/// Stroke and fill attributes. Carried, never interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub color: String,
    pub width: u32,
    pub fill: Option<String>,
}

impl Default for Style {
    fn default() -> Self {
        Self { color: "black".into(), width: 2, fill: None }
    }
}

/// What a shape is, with only the fields that kind can carry.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Connector(Connector),
    Outline(Outline),
    Text(TextBlock),
}

/// A drawable entity.
///
/// Serializes through the flat [`ShapeRecord`] wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShapeRecord", into = "ShapeRecord")]
pub struct Shape {
    /// Stable id; [`UNASSIGNED`] until inserted into a drawing.
    pub id: ShapeId,
    pub style: Style,
    /// Optional caption drawn near the shape's centre.
    pub label: Option<String>,
    /// Offset of the label from the shape's centre.
    pub label_offset: Point,
    pub geometry: Geometry,
}

impl Shape {
    /// Wrap `geometry` in an unassigned shape with default style.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self { id: UNASSIGNED, style: Style::default(), label: None, label_offset: Point::default(), geometry }
    }

    /// A closed shape from a drag gesture `from -> to`.
    ///
    /// Squares take the larger drag extent on both axes. Circles are centred
    /// on `from` with the drag length as radius.
    #[must_use]
    pub fn outline(kind: OutlineKind, from: Point, to: Point) -> Self {
        let (p1, p2) = match kind {
            OutlineKind::Circle => {
                let r = from.distance(to);
                (from.offset(-r, -r), from.offset(r, r))
            }
            OutlineKind::Square => {
                let size = (to.x - from.x).abs().max((to.y - from.y).abs());
                let x2 = if to.x > from.x { from.x + size } else { from.x - size };
                let y2 = if to.y > from.y { from.y + size } else { from.y - size };
                (from, Point::new(x2, y2))
            }
            OutlineKind::Rectangle | OutlineKind::Ellipse | OutlineKind::Triangle => (from, to),
        };
        Self::new(Geometry::Outline(Outline { kind, p1, p2 }))
    }

    /// A straight line or arrow.
    #[must_use]
    pub fn straight(head: Head, start: Point, end: Point) -> Self {
        Self::new(Geometry::Connector(Connector {
            start,
            end,
            head,
            path: PathStyle::Straight,
            links: Links::default(),
        }))
    }

    /// An orthogonal line or arrow through `waypoints`, horizontal-first.
    #[must_use]
    pub fn orthogonal(head: Head, start: Point, waypoints: Vec<Point>, end: Point) -> Self {
        Self::new(Geometry::Connector(Connector {
            start,
            end,
            head,
            path: PathStyle::Orthogonal { waypoints, routing: Routing::default() },
            links: Links::default(),
        }))
    }

    /// A text shape anchored at `anchor`.
    #[must_use]
    pub fn text(anchor: Point, text: impl Into<String>, font: Font) -> Self {
        Self::new(Geometry::Text(TextBlock { anchor, text: text.into(), font }))
    }

    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Flat discriminant of this shape.
    #[must_use]
    pub fn shape_type(&self) -> ShapeType {
        match &self.geometry {
            Geometry::Connector(c) => match (&c.path, c.head) {
                (PathStyle::Straight, Head::Plain) => ShapeType::Line,
                (PathStyle::Straight, Head::Arrow) => ShapeType::Arrow,
                (PathStyle::Orthogonal { .. }, Head::Plain) => ShapeType::OrthoLine,
                (PathStyle::Orthogonal { .. }, Head::Arrow) => ShapeType::OrthoArrow,
            },
            Geometry::Outline(o) => match o.kind {
                OutlineKind::Rectangle => ShapeType::Rectangle,
                OutlineKind::Square => ShapeType::Square,
                OutlineKind::Circle => ShapeType::Circle,
                OutlineKind::Ellipse => ShapeType::Ellipse,
                OutlineKind::Triangle => ShapeType::Triangle,
            },
            Geometry::Text(_) => ShapeType::Text,
        }
    }

    #[must_use]
    pub fn is_connector(&self) -> bool {
        matches!(self.geometry, Geometry::Connector(_))
    }

    /// Whether connectors may attach to this shape. Only outlines carry
    /// anchors, so connectors and text never can.
    #[must_use]
    pub fn is_snap_target(&self) -> bool {
        matches!(self.geometry, Geometry::Outline(_))
    }

    #[must_use]
    pub fn connector(&self) -> Option<&Connector> {
        match &self.geometry {
            Geometry::Connector(c) => Some(c),
            _ => None,
        }
    }

    pub fn connector_mut(&mut self) -> Option<&mut Connector> {
        match &mut self.geometry {
            Geometry::Connector(c) => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn outline_geometry(&self) -> Option<&Outline> {
        match &self.geometry {
            Geometry::Outline(o) => Some(o),
            _ => None,
        }
    }

    /// Connections of a connector; `None` for shapes that cannot carry any.
    #[must_use]
    pub fn links(&self) -> Option<&Links> {
        self.connector().map(|c| &c.links)
    }

    /// Coordinate of a connector endpoint.
    #[must_use]
    pub fn endpoint(&self, endpoint: Endpoint) -> Option<Point> {
        self.connector().map(|c| c.endpoint(endpoint))
    }

    /// The `(x1, y1)` / `(x2, y2)` pair. Text returns its anchor twice.
    #[must_use]
    pub fn corners(&self) -> (Point, Point) {
        match &self.geometry {
            Geometry::Connector(c) => (c.start, c.end),
            Geometry::Outline(o) => (o.p1, o.p2),
            Geometry::Text(t) => (t.anchor, t.anchor),
        }
    }

    /// Overwrite the `(x1, y1)` / `(x2, y2)` pair. Text takes `p1` as its anchor.
    pub fn set_corners(&mut self, p1: Point, p2: Point) {
        match &mut self.geometry {
            Geometry::Connector(c) => {
                c.start = p1;
                c.end = p2;
            }
            Geometry::Outline(o) => {
                o.p1 = p1;
                o.p2 = p2;
            }
            Geometry::Text(t) => t.anchor = p1,
        }
    }

    /// `(min(x1,x2), min(y1,y2), max(x1,x2), max(y1,y2))`.
    #[must_use]
    pub fn bounding_box(&self) -> Bounds {
        let (p1, p2) = self.corners();
        Bounds::from_corners(p1, p2)
    }

    /// Shift every coordinate, including waypoints, by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match &mut self.geometry {
            Geometry::Connector(c) => c.translate(dx, dy),
            Geometry::Outline(o) => {
                o.p1 = o.p1.offset(dx, dy);
                o.p2 = o.p2.offset(dx, dy);
            }
            Geometry::Text(t) => t.anchor = t.anchor.offset(dx, dy),
        }
    }

    /// A detached, unassigned copy shifted by `(dx, dy)`.
    #[must_use]
    pub fn clone_offset(&self, dx: f64, dy: f64) -> Shape {
        let mut copy = self.clone();
        copy.id = UNASSIGNED;
        copy.translate(dx, dy);
        if let Some(c) = copy.connector_mut() {
            c.links.clear();
        }
        copy
    }

    /// Resize an outline by dragging `handle` to `to`.
    ///
    /// Returns false for connectors and text, which have no resize handles.
    pub fn resize(&mut self, handle: ResizeHandle, to: Point) -> bool {
        match &mut self.geometry {
            Geometry::Outline(o) => {
                o.resize(handle, to);
                true
            }
            Geometry::Connector(_) | Geometry::Text(_) => false,
        }
    }
}
