//! Document → render-ready component list.

use crate::variables::VariableValues;
use crate::{bounds, flatten, overlay};
use labelpress_types::{BoundsRect, Component, ComponentKind, ExportWarning, LabelDocument, Size};
use serde::Serialize;

/// A label ready for rendering: paint-ordered components, the bounds rects
/// they refer to, and everything that degraded along the way.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComposedLabel {
    pub size: Size,
    pub components: Vec<Component>,
    pub bounds_rects: Vec<BoundsRect>,
    pub warnings: Vec<ExportWarning>,
}

/// Runs variable substitution, flattening, bounds-rect resolution and
/// overlay merging over one document.
///
/// A document without a tree but with pre-flattened `components` renders
/// those components as given; indices they already carry are kept.
pub fn compose(doc: &LabelDocument, variables: &VariableValues) -> ComposedLabel {
    let mut overlays = doc.overlays.clone();
    let mut warnings = variables.apply(&mut overlays);

    let rects = bounds::resolve_document(doc);

    let components = if !doc.document_tree.is_empty() {
        let flattened = flatten::flatten_with_warnings(&doc.document_tree, 1.0);
        warnings.extend(flattened.warnings);
        let mut components = flattened.components;
        bounds::assign_all(&mut components, &rects);
        components
    } else {
        let mut components = doc.components.clone();
        for component in components.iter_mut().filter(|c| c.bounds_rect.is_none()) {
            component.bounds_rect = bounds::assign(component, &rects);
        }
        components
    };

    let components = overlay::merge(components, &overlays, &rects);
    warnings.extend(components.iter().flat_map(invalid_colors));
    log::debug!(
        "Composed {} component(s), {} bounds rect(s), {} warning(s)",
        components.len(),
        rects.len(),
        warnings.len()
    );

    ComposedLabel { size: doc.label_size(), components, bounds_rects: rects, warnings }
}

/// Colors that failed to parse on `component`; each one painted black.
fn invalid_colors(component: &Component) -> Vec<ExportWarning> {
    let colors = match &component.kind {
        ComponentKind::Text(text) | ComponentKind::TextRegion(text) => vec![&text.color],
        ComponentKind::Path(path) => path.path_data.fill.iter().chain(path.path_data.stroke.iter()).collect(),
        _ => Vec::new(),
    };
    colors
        .into_iter()
        .filter_map(|color| color.invalid())
        .map(|value| ExportWarning::InvalidColor { component: component.id.clone(), value: value.to_string() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelpress_testing::fixtures;
    use labelpress_types::ComponentId;
    use serde_json::json;

    fn document(value: serde_json::Value) -> LabelDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_simple_label_composes_frame_then_overlay() {
        let doc = document(fixtures::simple_label());
        let composed = compose(&doc, &VariableValues::new());
        assert_eq!(composed.size, Size::new(100.0, 50.0));
        let kinds: Vec<&str> = composed.components.iter().map(|c| c.type_name()).collect();
        assert_eq!(kinds.last(), Some(&"text"));
        assert!(composed.warnings.is_empty());
    }

    #[test]
    fn test_placeholder_under_overlay_is_replaced_by_variable_content() {
        let doc = document(json!({
            "label": {"width": 100, "height": 50},
            "documentTree": [fixtures::rect_path("placeholder", 5.0, 5.0, 20.0, 20.0, fixtures::rgb(0, 0, 0))],
            "overlays": [{"x": 0, "y": 0, "w": 40, "h": 40, "content": "{name}", "isVariable": true}],
        }));
        let composed = compose(&doc, &VariableValues::new().with("0", "Ada"));

        assert_eq!(composed.components.len(), 1);
        let text = composed.components[0].text().unwrap();
        assert_eq!(text.content, "Ada");
        assert_eq!(composed.components[0].id, Some(ComponentId::for_overlay(0)));
    }

    #[test]
    fn test_components_receive_bounds_indices() {
        let doc = document(json!({
            "label": {"width": 100, "height": 50},
            "documentTree": [fixtures::rect_path("p", 28.35, 28.35, 28.35, 28.35, fixtures::rgb(0, 0, 0))],
            "boundsRects": [{"x": 0, "y": 0, "w": 50, "h": 50}],
            "boundsRectRotations": [90],
        }));
        let composed = compose(&doc, &VariableValues::new());
        assert_eq!(composed.bounds_rects[0].rotation, 90.0);
        assert_eq!(composed.components[0].bounds_rect, Some(0));
    }

    #[test]
    fn test_pre_flattened_components_are_rendered_as_given() {
        let doc = document(json!({
            "label": {"width": 60, "height": 30},
            "components": [
                {"type": "pdfpath", "x": 0, "y": 0, "width": 10, "height": 10,
                 "pathData": {"ops": [{"o": "M", "a": [0, 0]}, {"o": "L", "a": [10, 0]}, {"o": "Z"}], "fill": [1, 0, 0]},
                 "boundsRectIdx": 3},
                {"type": "text", "x": 30, "y": 0, "width": 20, "height": 10, "content": "hi"}
            ],
        }));
        let composed = compose(&doc, &VariableValues::new());
        assert_eq!(composed.components.len(), 2);
        assert_eq!(composed.components[0].bounds_rect, Some(3));
        assert_eq!(composed.components[1].bounds_rect, None);
    }

    #[test]
    fn test_unparsable_path_colors_are_reported_per_component() {
        let doc = document(json!({
            "label": {"width": 60, "height": 30},
            "components": [
                {"type": "pdfpath", "id": "p1", "x": 0, "y": 0, "width": 10, "height": 10,
                 "pathData": {"ops": [{"o": "M", "a": [0, 0]}, {"o": "L", "a": [10, 0]}], "fill": "#12345", "stroke": [0, 0, 1]}}
            ],
        }));
        let composed = compose(&doc, &VariableValues::new());
        assert_eq!(
            composed.warnings,
            vec![ExportWarning::InvalidColor { component: Some(ComponentId::new("p1")), value: "#12345".into() }]
        );
    }

    #[test]
    fn test_flatten_warnings_and_unused_variables_are_collected() {
        let doc = document(json!({
            "documentTree": [{"type": "symbol", "id": "s1"}],
        }));
        let composed = compose(&doc, &VariableValues::new().with("serial", "1"));
        assert_eq!(composed.warnings.len(), 2);
    }
}
