#![allow(dead_code)]

pub use labelpress_testing::fixtures::*;
use serde_json::{Value, json};

/// A label holding only the given overlays.
pub fn label_with_overlays(width: f64, height: f64, overlays: Vec<Value>) -> Value {
    json!({
        "label": { "width": width, "height": height },
        "overlays": overlays
    })
}

/// A pre-flattened path component covering `(x, y, w, h)` mm.
pub fn path_component(x: f64, y: f64, w: f64, h: f64, visible: bool) -> Value {
    json!({
        "type": "pdfpath",
        "x": x, "y": y, "width": w, "height": h,
        "visible": visible,
        "pathData": {
            "ops": [
                {"o": "M", "a": [x, y]},
                {"o": "L", "a": [x + w, y]},
                {"o": "L", "a": [x + w, y + h]},
                {"o": "L", "a": [x, y + h]},
                {"o": "Z", "a": []}
            ],
            "fill": [0, 0, 0]
        }
    })
}

/// A pre-flattened text component.
pub fn text_component(content: &str, x: f64, y: f64, w: f64, h: f64) -> Value {
    json!({
        "type": "text",
        "x": x, "y": y, "width": w, "height": h,
        "content": content,
        "fontSize": 12,
        "alignH": "left",
        "alignV": "top"
    })
}
