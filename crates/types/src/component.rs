//! Flat drawable primitives: the unit the renderer consumes.
//!
//! Field names and the `type` tags (`pdfpath`, `text`, `textregion`, ...)
//! match the export payload wire format, so a component list produced by an
//! earlier flatten can be rendered again unchanged.

use crate::color::Color;
use crate::geometry::{Point, Rect};
use crate::ids::ComponentId;
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_opacity() -> f64 {
    1.0
}

fn default_font_size() -> f64 {
    12.0
}

fn default_line_width() -> f64 {
    0.5
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ComponentId>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Component-level rotation in degrees (overlays only).
    #[serde(default)]
    pub rotation: f64,
    #[serde(default, rename = "boundsRectIdx", with = "bounds_index")]
    pub bounds_rect: Option<usize>,
    /// Inherited opacity in 0.0..=1.0. Carried through but not applied to paint.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    #[serde(flatten)]
    pub kind: ComponentKind,
}

impl Component {
    pub fn new(frame: Rect, kind: ComponentKind) -> Self {
        Self {
            id: None,
            x: frame.x,
            y: frame.y,
            width: frame.width,
            height: frame.height,
            visible: true,
            rotation: 0.0,
            bounds_rect: None,
            opacity: 1.0,
            kind,
        }
    }

    pub fn with_id(mut self, id: ComponentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn frame(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn centroid(&self) -> Point {
        self.frame().center()
    }

    pub fn is_path(&self) -> bool {
        matches!(self.kind, ComponentKind::Path(_))
    }

    pub fn text(&self) -> Option<&TextComponent> {
        match &self.kind {
            ComponentKind::Text(t) | ComponentKind::TextRegion(t) => Some(t),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ComponentKind {
    #[serde(rename = "pdfpath")]
    Path(PathComponent),
    /// Overlay text.
    #[serde(rename = "text")]
    Text(TextComponent),
    /// Text flattened from the document tree.
    #[serde(rename = "textregion")]
    TextRegion(TextComponent),
    #[serde(rename = "image")]
    Image(ImageComponent),
    #[serde(rename = "qr")]
    Qr(QrComponent),
    #[serde(rename = "barcode")]
    Barcode(BarcodeComponent),
}

impl ComponentKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentKind::Path(_) => "pdfpath",
            ComponentKind::Text(_) => "text",
            ComponentKind::TextRegion(_) => "textregion",
            ComponentKind::Image(_) => "image",
            ComponentKind::Qr(_) => "qr",
            ComponentKind::Barcode(_) => "barcode",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathComponent {
    pub path_data: PathData,
    /// Compound paths fill with the even-odd rule so inner sub-paths cut holes.
    #[serde(default)]
    pub is_compound: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    #[serde(default)]
    pub ops: Vec<PathOp>,
    #[serde(default)]
    pub fill: Option<Color>,
    #[serde(default)]
    pub stroke: Option<Color>,
    /// Stroke width in millimeters.
    #[serde(default = "default_line_width")]
    pub lw: f64,
}

/// A path command. Coordinates are millimeters in document space
/// (origin top-left, y down); the renderer flips them onto the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireOp", into = "WireOp")]
pub enum PathOp {
    MoveTo(f64, f64),
    LineTo(f64, f64),
    CurveTo(f64, f64, f64, f64, f64, f64),
    ClosePath,
}

impl PathOp {
    /// Points referenced by this op, control points included.
    pub fn points(&self) -> Vec<Point> {
        match *self {
            PathOp::MoveTo(x, y) | PathOp::LineTo(x, y) => vec![Point::new(x, y)],
            PathOp::CurveTo(x1, y1, x2, y2, x3, y3) => {
                vec![Point::new(x1, y1), Point::new(x2, y2), Point::new(x3, y3)]
            }
            PathOp::ClosePath => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireOp {
    o: String,
    #[serde(default)]
    a: Vec<f64>,
}

impl TryFrom<WireOp> for PathOp {
    type Error = String;

    fn try_from(op: WireOp) -> Result<Self, Self::Error> {
        match (op.o.as_str(), op.a.as_slice()) {
            ("M", [x, y, ..]) => Ok(PathOp::MoveTo(*x, *y)),
            ("L", [x, y, ..]) => Ok(PathOp::LineTo(*x, *y)),
            ("C", [x1, y1, x2, y2, x3, y3, ..]) => Ok(PathOp::CurveTo(*x1, *y1, *x2, *y2, *x3, *y3)),
            ("Z", _) => Ok(PathOp::ClosePath),
            (o, a) => Err(format!("malformed path op '{}' with {} operands", o, a.len())),
        }
    }
}

impl From<PathOp> for WireOp {
    fn from(op: PathOp) -> Self {
        let (o, a) = match op {
            PathOp::MoveTo(x, y) => ("M", vec![x, y]),
            PathOp::LineTo(x, y) => ("L", vec![x, y]),
            PathOp::CurveTo(x1, y1, x2, y2, x3, y3) => ("C", vec![x1, y1, x2, y2, x3, y3]),
            PathOp::ClosePath => ("Z", Vec::new()),
        };
        WireOp { o: o.to_string(), a }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextComponent {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub font_family: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "crate::serde_util::opt_string_or_number")]
    pub font_id: Option<String>,
    /// Font size in points.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub color: Color,
    /// Extra spacing in points, added per glyph and to the line height.
    #[serde(default)]
    pub letter_spacing: f64,
    #[serde(default)]
    pub align_h: HAlign,
    #[serde(default)]
    pub align_v: VAlign,
}

impl Default for TextComponent {
    fn default() -> Self {
        Self {
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
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageComponent {
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub image_fit: ImageFit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrComponent {
    #[serde(default)]
    pub qr_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeComponent {
    #[serde(default)]
    pub barcode_data: String,
    #[serde(default)]
    pub barcode_format: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl From<String> for HAlign {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" | "centre" => HAlign::Center,
            "right" => HAlign::Right,
            _ => HAlign::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum VAlign {
    #[default]
    Top,
    Center,
    Bottom,
}

impl From<String> for VAlign {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "center" | "middle" => VAlign::Center,
            "bottom" => VAlign::Bottom,
            _ => VAlign::Top,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

impl From<String> for ImageFit {
    fn from(s: String) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "cover" => ImageFit::Cover,
            "fill" | "stretch" => ImageFit::Fill,
            _ => ImageFit::Contain,
        }
    }
}

/// `boundsRectIdx` on the wire: a non-negative index, or `-1` for none.
mod bounds_index {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(index) => serializer.serialize_i64(*index as i64),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
        let raw = Option::<i64>::deserialize(deserializer)?;
        Ok(raw.filter(|i| *i >= 0).map(|i| i as usize))
    }
}
