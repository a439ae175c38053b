//! JSON import/export of a [`Drawing`].
//!
//! The file is `{ "version": "1.0", "next_id": n, "shapes": [...] }` where each
//! shape is a flat [`ShapeRecord`]. The record keeps the field names of the
//! legacy `.abdraw` format so existing drawings load unchanged: `z_order`
//! and other unknown keys are ignored (sequence order is z-order), and
//! optional fields fall back to their defaults. Geometry (`x1`, `y1`, `x2`,
//! `y2`) and `shape_type` are required.

#[cfg(test)]
#[path = "persist_test.rs"]
mod persist_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::consts::{FORMAT_VERSION, MAX_SHAPE_ID};
use crate::drawing::Drawing;
use crate::geom::Point;
use crate::shape::{
    Connection, Connector, Font, Geometry, Head, Links, Outline, OutlineKind, PathStyle, Routing, Shape, ShapeId,
    ShapeType, Style, TextBlock, UNASSIGNED,
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid drawing JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported drawing version '{0}' (expected '1.0')")]
    UnsupportedVersion(String),
    #[error("duplicate shape id {0}")]
    DuplicateId(ShapeId),
    #[error("shape id {0} is out of range")]
    IdOverflow(ShapeId),
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to encode drawing: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Wire records ────────────────────────────────────────────────

/// One shape as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeRecord {
    #[serde(default)]
    pub shape_id: ShapeId,
    pub shape_type: ShapeType,
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default)]
    pub fill_color: Option<String>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    #[serde(default)]
    pub font_bold: bool,
    #[serde(default)]
    pub font_italic: bool,
    #[serde(default = "default_text_align")]
    pub text_align: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub label_offset_x: f64,
    #[serde(default)]
    pub label_offset_y: f64,
    #[serde(default)]
    pub routing: Routing,
    /// Interior points as `[x, y]` pairs.
    #[serde(default)]
    pub waypoints: Vec<[f64; 2]>,
}

fn default_color() -> String {
    Style::default().color
}

fn default_width() -> u32 {
    Style::default().width
}

fn default_font_family() -> String {
    Font::default().family
}

fn default_font_size() -> u32 {
    Font::default().size
}

fn default_text_align() -> String {
    Font::default().align
}

fn outline_kind(shape_type: ShapeType) -> Option<OutlineKind> {
    match shape_type {
        ShapeType::Rectangle => Some(OutlineKind::Rectangle),
        ShapeType::Square => Some(OutlineKind::Square),
        ShapeType::Circle => Some(OutlineKind::Circle),
        ShapeType::Ellipse => Some(OutlineKind::Ellipse),
        ShapeType::Triangle => Some(OutlineKind::Triangle),
        ShapeType::Line | ShapeType::Arrow | ShapeType::OrthoLine | ShapeType::OrthoArrow | ShapeType::Text => None,
    }
}

impl From<ShapeRecord> for Shape {
    fn from(r: ShapeRecord) -> Self {
        let p1 = Point::new(r.x1, r.y1);
        let p2 = Point::new(r.x2, r.y2);

        let geometry = if r.shape_type.is_connector() {
            let head = match r.shape_type {
                ShapeType::Arrow | ShapeType::OrthoArrow => Head::Arrow,
                _ => Head::Plain,
            };
            let path = if r.shape_type.is_orthogonal() {
                let waypoints = r.waypoints.iter().map(|&[x, y]| Point::new(x, y)).collect();
                PathStyle::Orthogonal { waypoints, routing: r.routing }
            } else {
                PathStyle::Straight
            };
            // Later entries for the same endpoint win.
            let mut links = Links::default();
            for conn in &r.connections {
                links.set(conn.endpoint, Some(conn.target_id));
            }
            Geometry::Connector(Connector { start: p1, end: p2, head, path, links })
        } else if let Some(kind) = outline_kind(r.shape_type) {
            Geometry::Outline(Outline { kind, p1, p2 })
        } else {
            Geometry::Text(TextBlock {
                anchor: p1,
                text: r.text.unwrap_or_default(),
                font: Font {
                    family: r.font_family,
                    size: r.font_size,
                    bold: r.font_bold,
                    italic: r.font_italic,
                    align: r.text_align,
                },
            })
        };

        Shape {
            id: r.shape_id,
            style: Style { color: r.color, width: r.width, fill: r.fill_color },
            label: r.label,
            label_offset: Point::new(r.label_offset_x, r.label_offset_y),
            geometry,
        }
    }
}

impl From<Shape> for ShapeRecord {
    fn from(shape: Shape) -> Self {
        let shape_type = shape.shape_type();
        let (p1, p2) = shape.corners();
        let Shape { id, style, label, label_offset, geometry } = shape;
        let font = Font::default();

        let mut record = ShapeRecord {
            shape_id: id,
            shape_type,
            x1: p1.x,
            y1: p1.y,
            x2: p2.x,
            y2: p2.y,
            color: style.color,
            width: style.width,
            fill_color: style.fill,
            connections: Vec::new(),
            text: None,
            font_family: font.family,
            font_size: font.size,
            font_bold: font.bold,
            font_italic: font.italic,
            text_align: font.align,
            label,
            label_offset_x: label_offset.x,
            label_offset_y: label_offset.y,
            routing: Routing::default(),
            waypoints: Vec::new(),
        };

        match geometry {
            Geometry::Connector(c) => {
                record.connections = c.links.iter().collect();
                if let PathStyle::Orthogonal { waypoints, routing } = c.path {
                    record.routing = routing;
                    record.waypoints = waypoints.iter().map(|p| [p.x, p.y]).collect();
                }
            }
            Geometry::Text(t) => {
                record.text = Some(t.text);
                record.font_family = t.font.family;
                record.font_size = t.font.size;
                record.font_bold = t.font.bold;
                record.font_italic = t.font.italic;
                record.text_align = t.font.align;
            }
            Geometry::Outline(_) => {}
        }
        record
    }
}

// ── File envelope ───────────────────────────────────────────────

#[derive(Deserialize)]
struct DrawingFile {
    #[serde(default = "default_version")]
    version: String,
    #[serde(default)]
    next_id: Option<ShapeId>,
    #[serde(default)]
    shapes: Vec<Shape>,
}

#[derive(Serialize)]
struct DrawingFileRef<'a> {
    version: &'a str,
    next_id: ShapeId,
    shapes: &'a [Shape],
}

fn default_version() -> String {
    FORMAT_VERSION.to_string()
}

impl Drawing {
    /// Parse a drawing file and re-derive every connector endpoint.
    ///
    /// Shapes keep their stored ids. Shapes without one are numbered after the
    /// largest stored id, in file order. `next_id` defaults to one past the
    /// largest id when absent. Connections to shapes that are not in the file
    /// are kept but left unresolved.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let file: DrawingFile = serde_json::from_str(json)?;
        if file.version != FORMAT_VERSION {
            warn!(version = %file.version, "rejected drawing with unsupported version");
            return Err(LoadError::UnsupportedVersion(file.version));
        }

        let mut explicit = HashSet::new();
        for id in file.shapes.iter().map(|s| s.id).filter(|&id| id != UNASSIGNED) {
            if id > MAX_SHAPE_ID {
                warn!(id, "rejected drawing with out-of-range shape id");
                return Err(LoadError::IdOverflow(id));
            }
            if !explicit.insert(id) {
                warn!(id, "rejected drawing with duplicate shape id");
                return Err(LoadError::DuplicateId(id));
            }
        }
        if let Some(next_id) = file.next_id.filter(|&n| n > MAX_SHAPE_ID + 1) {
            warn!(next_id, "rejected drawing with out-of-range next id");
            return Err(LoadError::IdOverflow(next_id));
        }

        let mut drawing = Drawing::new();
        drawing.next_id = explicit.iter().max().map_or(1, |max| max + 1);
        for shape in file.shapes {
            drawing.insert(shape);
        }
        if let Some(next_id) = file.next_id {
            drawing.next_id = drawing.next_id.max(next_id);
        }

        let rebuilt = drawing.rebuild();
        info!(shapes = drawing.len(), next_id = drawing.next_id, rebuilt = rebuilt.len(), "drawing loaded");
        Ok(drawing)
    }

    /// Encode the drawing as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SaveError> {
        let file = DrawingFileRef { version: FORMAT_VERSION, next_id: self.next_id, shapes: &self.shapes };
        let json = serde_json::to_string_pretty(&file)?;
        info!(shapes = self.len(), bytes = json.len(), "drawing saved");
        Ok(json)
    }
}
