//! The authoring-side document model: the editable node tree, overlays and
//! bounds-rect metadata, as handed over by the layout store.
//!
//! Tree geometry (points, handles, bounds) is in points; overlays and
//! bounds rects are already in millimeters.

use crate::color::{Color, Paint};
use crate::component::{Component, HAlign, ImageFit, VAlign};
use crate::geometry::{Point, Rect, Size};
use crate::ids::ComponentId;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    100.0
}

fn default_font_size() -> f64 {
    12.0
}

fn default_barcode_format() -> String {
    "code128".to_string()
}

const DEFAULT_LABEL_SIDE_MM: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSize {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

/// One label to export.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelDocument {
    #[serde(default)]
    pub label: Option<LabelSize>,
    #[serde(default, alias = "label_width")]
    pub doc_width: Option<f64>,
    #[serde(default, alias = "label_height")]
    pub doc_height: Option<f64>,
    #[serde(default)]
    pub document_tree: Vec<DocumentNode>,
    /// A previously flattened component list, used when no tree is present.
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub overlays: Vec<Overlay>,
    #[serde(default)]
    pub bounds_rects: Vec<BoundsRectMeta>,
    #[serde(default)]
    pub bounds_rect_rotations: Vec<Option<f64>>,
    #[serde(default)]
    pub outlined: bool,
    #[serde(default)]
    pub separate_invisible: bool,
}

impl LabelDocument {
    /// Physical label size in millimeters.
    pub fn label_size(&self) -> Size {
        if let Some(label) = self.label {
            return Size::new(label.width, label.height);
        }
        Size::new(
            self.doc_width.unwrap_or(DEFAULT_LABEL_SIDE_MM),
            self.doc_height.unwrap_or(DEFAULT_LABEL_SIDE_MM),
        )
    }
}

/// A node of the editable document tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawNode")]
pub struct DocumentNode {
    pub id: Option<ComponentId>,
    /// Opacity in percent (0-100).
    pub opacity: f64,
    pub visible: bool,
    /// Bounding box in points.
    pub bounds: Rect,
    /// Editor-only artifacts (`_isBoundsRect`, `_isDoubledText`) that are never exported.
    pub editor_only: bool,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Group(Vec<DocumentNode>),
    Path(PathNode),
    CompoundPath { paths: Vec<PathNode>, style: ShapeStyle },
    Text(Vec<Paragraph>),
    /// A node kind this engine does not export; carries the raw `type` tag.
    Unknown(String),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    #[serde(default)]
    pub fill: Option<Paint>,
    #[serde(default)]
    pub stroke: Option<Paint>,
    /// Stroke width in points.
    #[serde(default)]
    pub stroke_width: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathNode {
    #[serde(default, alias = "pathData")]
    pub points: Vec<PathPoint>,
    #[serde(default)]
    pub closed: bool,
    #[serde(flatten)]
    pub style: ShapeStyle,
}

/// An anchor point with optional absolute bezier handles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathPoint {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub handle_in: Option<Point>,
    #[serde(default)]
    pub handle_out: Option<Point>,
}

impl PathPoint {
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub alignment: Option<String>,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub font_family: Option<String>,
    #[serde(default)]
    pub font_size: Option<f64>,
    #[serde(default)]
    pub color: Option<Paint>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(default)]
    id: Option<ComponentId>,
    #[serde(default, rename = "type")]
    node_type: Option<String>,
    #[serde(default = "default_opacity")]
    opacity: f64,
    #[serde(default = "default_true")]
    visible: bool,
    #[serde(default)]
    bounds: Option<Rect>,
    #[serde(default, rename = "_isBoundsRect")]
    is_bounds_rect: bool,
    #[serde(default, rename = "_isDoubledText")]
    is_doubled_text: bool,
    #[serde(default)]
    children: Vec<DocumentNode>,
    #[serde(default, alias = "pathData")]
    points: Vec<PathPoint>,
    #[serde(default)]
    closed: bool,
    #[serde(default)]
    fill: Option<Paint>,
    #[serde(default)]
    stroke: Option<Paint>,
    #[serde(default)]
    stroke_width: Option<f64>,
    #[serde(default)]
    paths: Vec<PathNode>,
    #[serde(default)]
    paragraphs: Vec<Paragraph>,
}

impl From<RawNode> for DocumentNode {
    fn from(raw: RawNode) -> Self {
        let style = ShapeStyle { fill: raw.fill, stroke: raw.stroke, stroke_width: raw.stroke_width };
        let kind = if !raw.children.is_empty() {
            NodeKind::Group(raw.children)
        } else {
            match raw.node_type.as_deref() {
                Some("path") => NodeKind::Path(PathNode { points: raw.points, closed: raw.closed, style }),
                Some("compoundPath") => NodeKind::CompoundPath { paths: raw.paths, style },
                Some("text") => NodeKind::Text(raw.paragraphs),
                Some("group") | Some("layer") => NodeKind::Group(Vec::new()),
                other => NodeKind::Unknown(other.unwrap_or("untyped").to_string()),
            }
        };

        DocumentNode {
            id: raw.id,
            opacity: raw.opacity,
            visible: raw.visible,
            bounds: raw.bounds.unwrap_or_default(),
            editor_only: raw.is_bounds_rect || raw.is_doubled_text,
            kind,
        }
    }
}

/// Bounds-rect layout metadata as stored on the layout.
///
/// Rects arrive overlay-style (`w`/`h`) or export-style (`width`/`height`);
/// both spellings may be present at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BoundsRectMeta {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub w: Option<f64>,
    #[serde(default)]
    pub h: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default, rename = "_rotation")]
    pub own_rotation: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
}

impl BoundsRectMeta {
    /// Extent with `w`/`h` taking precedence over `width`/`height`; absent is 0.
    pub fn size(&self) -> Size {
        Size::new(self.w.or(self.width).unwrap_or(0.0), self.h.or(self.height).unwrap_or(0.0))
    }
}

/// A resolved rotation anchor in millimeters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundsRect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Degrees, in the authoring (y-down) convention.
    #[serde(default)]
    pub rotation: f64,
}

impl BoundsRect {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Kind of a variable-content overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum OverlayKind {
    #[default]
    Text,
    Image,
    Qr,
    Barcode,
}

impl From<String> for OverlayKind {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => OverlayKind::Image,
            "qr" | "qrcode" => OverlayKind::Qr,
            "barcode" => OverlayKind::Barcode,
            _ => OverlayKind::Text,
        }
    }
}

/// A user-editable field placed over the static design. Geometry is in millimeters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    #[serde(default)]
    pub id: Option<ComponentId>,
    #[serde(default, rename = "type")]
    pub kind: OverlayKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub w: f64,
    #[serde(default)]
    pub h: f64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub font_family: String,
    #[serde(default, deserialize_with = "crate::serde_util::opt_string_or_number")]
    pub font_id: Option<String>,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub letter_spacing: f64,
    #[serde(default)]
    pub align_h: HAlign,
    #[serde(default)]
    pub align_v: VAlign,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_fit: ImageFit,
    #[serde(default)]
    pub qr_data: String,
    #[serde(default)]
    pub barcode_data: String,
    #[serde(default = "default_barcode_format")]
    pub barcode_format: String,
    #[serde(default)]
    pub is_variable: bool,
    #[serde(default, rename = "_rotation")]
    pub own_rotation: Option<f64>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default, rename = "_boundsRectIdx")]
    pub own_bounds_rect_idx: Option<i64>,
    #[serde(default)]
    pub bounds_rect_idx: Option<i64>,
}

impl Default for Overlay {
    fn default() -> Self {
        Self {
            id: None,
            kind: OverlayKind::Text,
            x: 0.0,
            y: 0.0,
            w: 0.0,
            h: 0.0,
            content: String::new(),
            font_family: String::new(),
            font_id: None,
            font_size: default_font_size(),
            bold: false,
            italic: false,
            color: Color::BLACK,
            letter_spacing: 0.0,
            align_h: HAlign::Left,
            align_v: VAlign::Top,
            visible: true,
            image_url: String::new(),
            image_fit: ImageFit::Contain,
            qr_data: String::new(),
            barcode_data: String::new(),
            barcode_format: default_barcode_format(),
            is_variable: false,
            own_rotation: None,
            rotation: None,
            own_bounds_rect_idx: None,
            bounds_rect_idx: None,
        }
    }
}

impl Overlay {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    /// Rotation in degrees; `_rotation` wins over `rotation`.
    pub fn rotation(&self) -> f64 {
        self.own_rotation.or(self.rotation).unwrap_or(0.0)
    }

    /// The pre-resolved bounds-rect index, if one was stored. Negative
    /// values mean "not resolved" and are treated as absent.
    pub fn stored_bounds_rect(&self) -> Option<usize> {
        self.own_bounds_rect_idx
            .or(self.bounds_rect_idx)
            .filter(|i| *i >= 0)
            .map(|i| i as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_kinds_from_json() {
        let nodes: Vec<DocumentNode> = serde_json::from_value(json!([
            {"type": "group", "children": [{"type": "path", "pathData": [{"x": 0, "y": 0}]}]},
            {"type": "compoundPath", "paths": [{"points": [], "fill": {"type": "none"}}]},
            {"type": "text", "paragraphs": [{"alignment": "center", "runs": [{"text": "A"}]}]},
            {"type": "placedImage"},
            {"type": "path", "_isBoundsRect": true}
        ]))
        .unwrap();

        assert!(matches!(&nodes[0].kind, NodeKind::Group(children) if children.len() == 1));
        assert!(matches!(&nodes[1].kind, NodeKind::CompoundPath { paths, .. } if paths.len() == 1));
        assert!(matches!(&nodes[2].kind, NodeKind::Text(p) if p.len() == 1));
        assert_eq!(nodes[3].kind, NodeKind::Unknown("placedImage".to_string()));
        assert!(nodes[4].editor_only);
        assert_eq!(nodes[0].opacity, 100.0);
    }

    #[test]
    fn test_label_size_fallbacks() {
        let doc: LabelDocument = serde_json::from_value(json!({"label": {"width": 80, "height": 40}})).unwrap();
        assert_eq!(doc.label_size(), Size::new(80.0, 40.0));

        let doc: LabelDocument = serde_json::from_value(json!({"docWidth": 60, "docHeight": 30})).unwrap();
        assert_eq!(doc.label_size(), Size::new(60.0, 30.0));

        let doc: LabelDocument = serde_json::from_value(json!({"label_width": 50, "label_height": 25})).unwrap();
        assert_eq!(doc.label_size(), Size::new(50.0, 25.0));
    }

    #[test]
    fn test_overlay_defaults_and_private_fields() {
        let ov: Overlay = serde_json::from_value(json!({
            "x": 1, "y": 2, "w": 3, "h": 4,
            "rotation": 10, "_rotation": 45,
            "boundsRectIdx": -1,
            "fontId": 3
        }))
        .unwrap();
        assert_eq!(ov.kind, OverlayKind::Text);
        assert_eq!(ov.font_size, 12.0);
        assert_eq!(ov.color, Color::BLACK);
        assert_eq!(ov.rotation(), 45.0);
        assert_eq!(ov.stored_bounds_rect(), None);
        assert_eq!(ov.font_id.as_deref(), Some("3"));
        assert_eq!(ov.barcode_format, "code128");
        assert!(ov.visible);
    }
}
