mod common;

use common::TestResult;
use common::fixtures::{self, rect_path, rgb};
use labelpress::{ComponentId, ExportRequest, ExportWarning, LabelDocument, VariableValues, compose};
use labelpress_types::{ComponentKind, PathOp, Rgb};
use serde_json::json;

fn document(value: serde_json::Value) -> LabelDocument {
    serde_json::from_value(value).expect("valid document")
}

fn ids(doc: &LabelDocument) -> Vec<String> {
    compose(doc, &VariableValues::new())
        .components
        .iter()
        .map(|c| c.id.as_ref().map(|id| id.to_string()).unwrap_or_default())
        .collect()
}

#[test]
fn test_composition_is_deterministic() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();
    let doc = document(json!({
        "label": {"width": 80, "height": 40},
        "documentTree": [
            rect_path("a", 0.0, 0.0, 20.0, 20.0, rgb(255, 0, 0)),
            {"type": "group", "opacity": 50, "children": [
                rect_path("b", 40.0, 0.0, 20.0, 20.0, json!({"type": "cmyk", "c": 0, "m": 100, "y": 100, "k": 0}))
            ]},
            fixtures::ring_compound("ring", 100.0, 50.0)
        ],
        "overlays": [fixtures::text_overlay("hi", 60.0, 20.0, 15.0, 10.0)],
        "boundsRects": [{"x": 0, "y": 0, "w": 40, "h": 40}]
    }));

    let first = compose(&doc, &VariableValues::new());
    let second = compose(&doc, &VariableValues::new());
    assert_eq!(first, second);
    assert_eq!(serde_json::to_vec(&first)?, serde_json::to_vec(&second)?);
    Ok(())
}

#[test]
fn test_siblings_paint_back_to_front() {
    let doc = document(json!({
        "label": {"width": 100, "height": 50},
        "documentTree": [
            rect_path("A", 0.0, 0.0, 10.0, 10.0, rgb(0, 0, 0)),
            rect_path("B", 20.0, 0.0, 10.0, 10.0, rgb(0, 0, 0))
        ]
    }));
    assert_eq!(ids(&doc), vec!["B", "A"]);
}

#[test]
fn test_points_become_millimeters() {
    let doc = document(json!({
        "label": {"width": 100, "height": 100},
        "documentTree": [rect_path("p", 72.0, 72.0, 72.0, 72.0, rgb(0, 0, 0))]
    }));
    let composed = compose(&doc, &VariableValues::new());
    let component = &composed.components[0];
    assert!((component.x - 25.4).abs() < 1e-6);
    assert!((component.width - 25.4).abs() < 1e-6);

    let ComponentKind::Path(path) = &component.kind else { panic!("expected a path") };
    let PathOp::MoveTo(x, y) = path.path_data.ops[0] else { panic!("expected a move") };
    assert!((x - 25.4).abs() < 1e-6);
    assert!((y - 25.4).abs() < 1e-6);
}

#[test]
fn test_overlay_drops_static_paths_it_covers() {
    // Centroids at (10, 10) and (30, 30) mm.
    let doc = document(json!({
        "label": {"width": 60, "height": 60},
        "components": [
            fixtures::path_component(5.0, 5.0, 10.0, 10.0, true),
            fixtures::path_component(25.0, 25.0, 10.0, 10.0, true)
        ],
        "overlays": [fixtures::text_overlay("cover", 0.0, 0.0, 20.0, 20.0)]
    }));
    let composed = compose(&doc, &VariableValues::new());

    assert_eq!(composed.components.len(), 2);
    assert!(composed.components[0].is_path());
    assert!((composed.components[0].centroid().x - 30.0).abs() < 1e-9);
    assert_eq!(composed.components[1].type_name(), "text");
}

#[test]
fn test_overlays_never_drop_text() {
    let doc = document(json!({
        "label": {"width": 60, "height": 60},
        "components": [fixtures::text_component("static", 5.0, 5.0, 10.0, 10.0)],
        "overlays": [fixtures::text_overlay("cover", 0.0, 0.0, 20.0, 20.0)]
    }));
    assert_eq!(compose(&doc, &VariableValues::new()).components.len(), 2);
}

#[test]
fn test_earlier_bounds_rect_wins_overlaps() {
    let doc = document(json!({
        "label": {"width": 100, "height": 100},
        "components": [fixtures::path_component(20.0, 20.0, 10.0, 10.0, true)],
        "boundsRects": [
            {"x": 10, "y": 10, "w": 50, "h": 50},
            {"x": 0, "y": 0, "w": 40, "h": 40}
        ]
    }));
    let composed = compose(&doc, &VariableValues::new());
    assert_eq!(composed.components[0].bounds_rect, Some(0));
}

#[test]
fn test_components_outside_every_rect_stay_unassigned() {
    let doc = document(json!({
        "label": {"width": 100, "height": 100},
        "components": [fixtures::path_component(80.0, 80.0, 10.0, 10.0, true)],
        "boundsRects": [{"x": 0, "y": 0, "w": 40, "h": 40}]
    }));
    assert_eq!(compose(&doc, &VariableValues::new()).components[0].bounds_rect, None);
}

#[test]
fn test_variables_fill_overlays_by_id() -> TestResult {
    let request = ExportRequest::from_json(
        &json!({
            "label": {"width": 50, "height": 20},
            "overlays": [{"id": "serial", "x": 0, "y": 0, "w": 50, "h": 20, "content": "{serial}", "isVariable": true}],
            "variables": {"serial": "SN-0042"}
        })
        .to_string(),
    )?;
    let composed = compose(&request.document, &request.variables);
    let text = composed.components[0].text().expect("text overlay");
    assert_eq!(text.content, "SN-0042");
    assert_eq!(composed.components[0].id, Some(ComponentId::from("serial")));
    Ok(())
}

#[test]
fn test_unparsable_overlay_color_paints_black_with_a_warning() {
    let doc = document(json!({
        "label": {"width": 60, "height": 20},
        "documentTree": [rect_path("frame", 0.0, 0.0, 10.0, 10.0, rgb(0, 0, 0))],
        "overlays": [
            {"id": "title", "x": 20, "y": 0, "w": 40, "h": 10, "content": "Hi", "color": "red"},
            {"id": "sub", "x": 20, "y": 10, "w": 40, "h": 10, "content": "There", "color": "#00f"}
        ]
    }));
    let composed = compose(&doc, &VariableValues::new());

    assert_eq!(composed.components.len(), 3);
    let title = composed.components[1].text().expect("text overlay");
    assert_eq!(title.color.rgb(), Rgb::BLACK);
    assert_eq!(composed.components[2].text().expect("text overlay").color.rgb(), Rgb::new(0.0, 0.0, 1.0));
    assert_eq!(
        composed.warnings,
        vec![ExportWarning::InvalidColor { component: Some(ComponentId::from("title")), value: "red".into() }]
    );
}
