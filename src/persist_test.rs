#![allow(clippy::float_cmp)]

use serde_json::{Value, json};

use super::*;
use crate::shape::Endpoint;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn rect_record(id: ShapeId, x1: f64, y1: f64, x2: f64, y2: f64) -> Value {
    json!({ "shape_id": id, "shape_type": "rectangle", "x1": x1, "y1": y1, "x2": x2, "y2": y2 })
}

// =============================================================
// Loading
// =============================================================

#[test]
fn loads_legacy_file_with_extra_fields() {
    let file = json!({
        "version": "1.0",
        "shapes": [{
            "shape_id": 4,
            "shape_type": "ellipse",
            "x1": 0.0, "y1": 0.0, "x2": 80.0, "y2": 40.0,
            "color": "red", "width": 3, "fill_color": "#ffeeee",
            "canvas_id": 17, "z_order": 2, "label_canvas_id": null,
            "label": "db", "label_offset_x": 4.0, "label_offset_y": -6.0
        }]
    });
    let d = Drawing::from_json(&file.to_string()).unwrap();

    let s = d.get(4).unwrap();
    assert_eq!(s.shape_type(), ShapeType::Ellipse);
    assert_eq!(s.style, Style { color: "red".into(), width: 3, fill: Some("#ffeeee".into()) });
    assert_eq!(s.label.as_deref(), Some("db"));
    assert_eq!(s.label_offset, pt(4.0, -6.0));
    assert_eq!(d.next_id(), 5);
}

#[test]
fn optional_fields_take_defaults() {
    let file = json!({
        "version": "1.0",
        "shapes": [{ "shape_id": 1, "shape_type": "ortho_arrow", "x1": 0, "y1": 0, "x2": 10, "y2": 10 }]
    });
    let d = Drawing::from_json(&file.to_string()).unwrap();
    let c = d.get(1).unwrap().connector().unwrap();
    assert_eq!(c.routing(), Some(Routing::HorizontalFirst));
    assert!(c.waypoints().is_empty());
    assert_eq!(c.head, Head::Arrow);
    assert_eq!(d.get(1).unwrap().style, Style::default());
}

#[test]
fn missing_geometry_is_an_error() {
    let file = json!({
        "version": "1.0",
        "shapes": [{ "shape_id": 1, "shape_type": "rectangle", "x1": 0, "y1": 0, "x2": 10 }]
    });
    let err = Drawing::from_json(&file.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)));
    assert!(err.to_string().contains("y2"), "{err}");
}

#[test]
fn missing_shape_type_is_an_error() {
    let file = json!({ "version": "1.0", "shapes": [{ "x1": 0, "y1": 0, "x2": 1, "y2": 1 }] });
    assert!(matches!(Drawing::from_json(&file.to_string()), Err(LoadError::Json(_))));
}

#[test]
fn unknown_version_is_rejected() {
    let file = json!({ "version": "2.0", "shapes": [] });
    let err = Drawing::from_json(&file.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedVersion(ref v) if v == "2.0"));
}

#[test]
fn duplicate_ids_are_rejected() {
    let file = json!({
        "version": "1.0",
        "shapes": [rect_record(3, 0.0, 0.0, 1.0, 1.0), rect_record(3, 5.0, 5.0, 6.0, 6.0)]
    });
    assert!(matches!(Drawing::from_json(&file.to_string()), Err(LoadError::DuplicateId(3))));
}

#[test]
fn missing_ids_are_numbered_after_stored_ones() {
    let file = json!({
        "version": "1.0",
        "shapes": [
            { "shape_type": "rectangle", "x1": 0, "y1": 0, "x2": 10, "y2": 10 },
            rect_record(1, 50.0, 50.0, 60.0, 60.0)
        ]
    });
    let d = Drawing::from_json(&file.to_string()).unwrap();

    let ids: Vec<ShapeId> = d.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![2, 1], "file order is kept as z-order");
    assert_eq!(d.get(1).unwrap().corners().0, pt(50.0, 50.0));
    assert_eq!(d.next_id(), 3);
}

#[test]
fn out_of_range_id_is_a_load_error() {
    let file = json!({ "version": "1.0", "shapes": [rect_record(ShapeId::MAX, 0.0, 0.0, 1.0, 1.0)] });
    let err = Drawing::from_json(&file.to_string()).unwrap_err();
    assert!(matches!(err, LoadError::IdOverflow(id) if id == ShapeId::MAX), "{err}");
}

#[test]
fn out_of_range_next_id_is_a_load_error() {
    let file = json!({ "version": "1.0", "next_id": ShapeId::MAX, "shapes": [] });
    assert!(matches!(Drawing::from_json(&file.to_string()), Err(LoadError::IdOverflow(_))));
}

#[test]
fn largest_accepted_id_loads() {
    let file = json!({ "version": "1.0", "shapes": [rect_record(MAX_SHAPE_ID, 0.0, 0.0, 1.0, 1.0)] });
    let d = Drawing::from_json(&file.to_string()).unwrap();
    assert!(d.contains(MAX_SHAPE_ID));
    assert_eq!(d.next_id(), MAX_SHAPE_ID + 1);
}

#[test]
fn explicit_next_id_is_honoured() {
    let file = json!({ "version": "1.0", "next_id": 40, "shapes": [rect_record(3, 0.0, 0.0, 1.0, 1.0)] });
    let d = Drawing::from_json(&file.to_string()).unwrap();
    assert_eq!(d.next_id(), 40);
}

#[test]
fn load_rebuilds_stale_endpoints() {
    // The box moved down 10 after the arrow was last resolved.
    let file = json!({
        "version": "1.0",
        "shapes": [
            rect_record(1, 0.0, 10.0, 100.0, 60.0),
            {
                "shape_id": 2, "shape_type": "arrow",
                "x1": 100.0, "y1": 25.0, "x2": 300.0, "y2": 25.0,
                "connections": [{ "target_id": 1, "endpoint": "start" }, { "target_id": 9, "endpoint": "end" }]
            }
        ]
    });
    let d = Drawing::from_json(&file.to_string()).unwrap();
    let arrow = d.get(2).unwrap();
    assert_eq!(arrow.corners(), (pt(100.0, 35.0), pt(300.0, 25.0)));
    let links = arrow.links().unwrap();
    assert_eq!(links.get(Endpoint::Start), Some(1));
    assert_eq!(links.get(Endpoint::End), Some(9), "dangling links survive a load");
}

#[test]
fn connections_on_outlines_are_dropped() {
    let mut record = rect_record(1, 0.0, 0.0, 1.0, 1.0);
    record["connections"] = json!([{ "target_id": 2, "endpoint": "start" }]);
    let file = json!({ "version": "1.0", "shapes": [record] });
    let d = Drawing::from_json(&file.to_string()).unwrap();
    assert!(d.get(1).unwrap().links().is_none());
}

#[test]
fn malformed_json_is_an_error() {
    assert!(matches!(Drawing::from_json("{ not json"), Err(LoadError::Json(_))));
}

// =============================================================
// Saving
// =============================================================

#[test]
fn save_writes_flat_records() {
    let mut d = Drawing::new();
    let a = d.insert(Shape::outline(OutlineKind::Rectangle, pt(0.0, 0.0), pt(100.0, 50.0)));
    let o = d.insert(Shape::orthogonal(Head::Plain, pt(100.0, 25.0), vec![pt(150.0, 80.0)], pt(200.0, 80.0)));
    d.set_connection(o, Endpoint::Start, a);
    d.flip_routing(o);

    let v: Value = serde_json::from_str(&d.to_json().unwrap()).unwrap();

    assert_eq!(v["version"], "1.0");
    assert_eq!(v["next_id"], 3);
    let line = &v["shapes"][1];
    assert_eq!(line["shape_type"], "ortho_line");
    assert_eq!(line["routing"], "v_first");
    assert_eq!(line["waypoints"], json!([[150.0, 80.0]]));
    assert_eq!(line["connections"], json!([{ "target_id": 1, "endpoint": "start" }]));
    assert_eq!(line["x1"], 100.0);
    assert_eq!(line["y2"], 80.0);
}

#[test]
fn text_round_trips_font_and_anchor() {
    let font = Font { family: "Courier".into(), size: 18, bold: true, italic: false, align: "center".into() };
    let mut d = Drawing::new();
    d.insert(Shape::text(pt(30.0, 40.0), "hello", font).with_label("note"));

    let json = d.to_json().unwrap();
    let v: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["shapes"][0]["x2"], 30.0, "text mirrors its anchor into x2/y2");
    assert_eq!(v["shapes"][0]["font_family"], "Courier");

    assert_eq!(Drawing::from_json(&json).unwrap(), d);
}

#[test]
fn save_then_load_preserves_drawing() {
    let mut d = Drawing::new();
    let a = d.insert(Shape::outline(OutlineKind::Triangle, pt(0.0, 0.0), pt(60.0, 30.0)));
    let b = d.insert(Shape::outline(OutlineKind::Circle, pt(200.0, 200.0), pt(210.0, 200.0)));
    let l = d.insert(Shape::straight(Head::Arrow, pt(30.0, 0.0), pt(190.0, 200.0)));
    d.set_connection(l, Endpoint::Start, a);
    d.set_connection(l, Endpoint::End, b);
    let scratch = d.insert(Shape::outline(OutlineKind::Square, pt(0.0, 0.0), pt(5.0, 5.0)));
    d.delete(scratch);

    let loaded = Drawing::from_json(&d.to_json().unwrap()).unwrap();
    assert_eq!(loaded, d);
    assert_eq!(loaded.next_id(), 5);
}
