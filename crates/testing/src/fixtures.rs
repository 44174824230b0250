use serde_json::{Value, json};

pub fn rgb(r: u8, g: u8, b: u8) -> Value {
    json!({ "type": "rgb", "r": r, "g": g, "b": b })
}

/// A closed rectangular path node, in points.
pub fn rect_path(id: &str, x: f64, y: f64, w: f64, h: f64, fill: Value) -> Value {
    json!({
        "id": id,
        "type": "path",
        "closed": true,
        "fill": fill,
        "bounds": { "x": x, "y": y, "width": w, "height": h },
        "pathData": [
            { "x": x, "y": y },
            { "x": x + w, "y": y },
            { "x": x + w, "y": y + h },
            { "x": x, "y": y + h }
        ]
    })
}

/// A compound path: outer square with an inner square of the same winding.
pub fn ring_compound(id: &str, outer: f64, inner: f64) -> Value {
    let offset = (outer - inner) / 2.0;
    let square = |x: f64, y: f64, side: f64| {
        json!({
            "type": "path",
            "closed": true,
            "pathData": [
                { "x": x, "y": y },
                { "x": x + side, "y": y },
                { "x": x + side, "y": y + side },
                { "x": x, "y": y + side }
            ]
        })
    };
    json!({
        "id": id,
        "type": "compoundPath",
        "fill": rgb(0, 0, 0),
        "bounds": { "x": 0, "y": 0, "width": outer, "height": outer },
        "paths": [square(0.0, 0.0, outer), square(offset, offset, inner)]
    })
}

pub fn text_overlay(content: &str, x: f64, y: f64, w: f64, h: f64) -> Value {
    json!({
        "type": "text",
        "x": x, "y": y, "w": w, "h": h,
        "content": content,
        "fontFamily": "Arial",
        "fontSize": 12,
        "alignH": "left",
        "alignV": "top"
    })
}

/// A 100 x 50 mm label with one static rectangle and one text overlay.
pub fn simple_label() -> Value {
    json!({
        "label": { "width": 100, "height": 50 },
        "documentTree": [rect_path("frame", 0.0, 0.0, 283.46, 141.73, rgb(200, 200, 200))],
        "overlays": [text_overlay("AB", 0.0, 0.0, 50.0, 20.0)],
        "boundsRects": []
    })
}
