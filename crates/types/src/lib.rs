pub mod color;
pub mod component;
pub mod document;
pub mod geometry;
pub mod ids;
mod serde_util;
pub mod warning;

pub use color::{Color, GradientStop, Paint, Rgb};
pub use component::{
    BarcodeComponent, Component, ComponentKind, HAlign, ImageComponent, ImageFit, PathComponent, PathData, PathOp,
    QrComponent, TextComponent, VAlign,
};
pub use document::{
    BoundsRect, BoundsRectMeta, DocumentNode, LabelDocument, NodeKind, Overlay, OverlayKind, Paragraph, PathNode,
    PathPoint, ShapeStyle, TextRun,
};
pub use geometry::{Affine, MM_TO_PT, PT_TO_MM, Point, Rect, Size};
pub use ids::ComponentId;
pub use warning::ExportWarning;
