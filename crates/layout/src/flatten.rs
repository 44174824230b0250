//! Document tree flattening.
//!
//! Walks the editable node tree and emits one drawable [`Component`] per
//! exportable leaf, in back-to-front paint order. Sibling lists are stored
//! front-to-back by the editor, so each list is visited in reverse.

use crate::color;
use labelpress_types::{
    Component, ComponentId, ComponentKind, DocumentNode, ExportWarning, HAlign, NodeKind, Paint, Paragraph,
    PathComponent, PathData, PathNode, PathOp, PathPoint, PT_TO_MM, Color, ShapeStyle, TextComponent, VAlign,
};

const DEFAULT_FAMILY: &str = "Arial";
const DEFAULT_SIZE_PT: f64 = 12.0;

/// Flattener output: components in paint order plus non-fatal findings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Flattened {
    pub components: Vec<Component>,
    pub warnings: Vec<ExportWarning>,
}

/// Flattens `nodes` into paint-ordered components. `inherited_opacity` is a
/// fraction (1.0 for a root list).
pub fn flatten(nodes: &[DocumentNode], inherited_opacity: f64) -> Vec<Component> {
    flatten_with_warnings(nodes, inherited_opacity).components
}

pub fn flatten_with_warnings(nodes: &[DocumentNode], inherited_opacity: f64) -> Flattened {
    let mut flattener = Flattener::default();
    flattener.walk(nodes, inherited_opacity, &mut Vec::new());
    flattener.out
}

#[derive(Default)]
struct Flattener {
    out: Flattened,
}

impl Flattener {
    fn walk(&mut self, nodes: &[DocumentNode], opacity: f64, index_path: &mut Vec<usize>) {
        for (index, node) in nodes.iter().enumerate().rev() {
            index_path.push(index);
            self.visit(node, opacity, index_path);
            index_path.pop();
        }
    }

    fn visit(&mut self, node: &DocumentNode, parent_opacity: f64, index_path: &mut Vec<usize>) {
        let id = node.id.clone().unwrap_or_else(|| ComponentId::for_tree_path(index_path));
        if node.editor_only {
            log::debug!("Skipping editor-only node {}", id);
            return;
        }
        let opacity = parent_opacity * node.opacity / 100.0;

        let kind = match &node.kind {
            NodeKind::Group(children) => {
                self.walk(children, opacity, index_path);
                return;
            }
            NodeKind::Path(path) => self.path(&id, path),
            NodeKind::CompoundPath { paths, style } => self.compound(&id, paths, style),
            NodeKind::Text(paragraphs) => Some(ComponentKind::TextRegion(text_component(paragraphs))),
            NodeKind::Unknown(kind) => {
                log::warn!("Skipping node {} of unsupported type '{}'", id, kind);
                self.out.warnings.push(ExportWarning::UnknownNodeKind { node: id, kind: kind.clone() });
                return;
            }
        };

        if let Some(kind) = kind {
            let mut component = Component::new(node.bounds.scaled(PT_TO_MM), kind).with_id(id);
            component.visible = node.visible;
            component.opacity = opacity;
            self.out.components.push(component);
        }
    }

    fn invalid(&mut self, id: &ComponentId, reason: &str) {
        log::warn!("Skipping node {}: {}", id, reason);
        self.out.warnings.push(ExportWarning::InvalidGeometry { node: id.clone(), reason: reason.to_string() });
    }

    fn path(&mut self, id: &ComponentId, path: &PathNode) -> Option<ComponentKind> {
        if path.points.is_empty() {
            self.invalid(id, "path has no points");
            return None;
        }
        Some(ComponentKind::Path(PathComponent {
            path_data: path_data(path_ops(&path.points, path.closed), &path.style, None),
            is_compound: false,
        }))
    }

    fn compound(&mut self, id: &ComponentId, paths: &[PathNode], style: &ShapeStyle) -> Option<ComponentKind> {
        let Some(first) = paths.first() else {
            self.invalid(id, "compound path has no sub-paths");
            return None;
        };
        let ops: Vec<PathOp> = paths
            .iter()
            .filter(|sub| !sub.points.is_empty())
            .flat_map(|sub| path_ops(&sub.points, sub.closed))
            .collect();
        if ops.is_empty() {
            self.invalid(id, "compound path has no drawable sub-paths");
            return None;
        }
        Some(ComponentKind::Path(PathComponent {
            path_data: path_data(ops, style, Some(&first.style)),
            is_compound: true,
        }))
    }
}

fn path_data(ops: Vec<PathOp>, own: &ShapeStyle, fallback: Option<&ShapeStyle>) -> PathData {
    let pick = |select: fn(&ShapeStyle) -> Option<&Paint>| select(own).or_else(|| fallback.and_then(select));
    let stroke_width = own.stroke_width.or_else(|| fallback.and_then(|s| s.stroke_width)).unwrap_or(0.0);
    PathData {
        ops,
        fill: color::resolve(pick(|s| s.fill.as_ref())).map(Color::from),
        stroke: color::resolve(pick(|s| s.stroke.as_ref())).map(Color::from),
        lw: stroke_width * PT_TO_MM,
    }
}

fn has_curve(from: &PathPoint, to: &PathPoint) -> bool {
    match (from.handle_out, to.handle_in) {
        (Some(out), Some(inc)) => out != from.anchor() || inc != to.anchor(),
        _ => false,
    }
}

fn segment(from: &PathPoint, to: &PathPoint) -> PathOp {
    let to_mm = to.anchor().scaled(PT_TO_MM);
    match (from.handle_out, to.handle_in) {
        (Some(out), Some(inc)) if has_curve(from, to) => {
            let c1 = out.scaled(PT_TO_MM);
            let c2 = inc.scaled(PT_TO_MM);
            PathOp::CurveTo(c1.x, c1.y, c2.x, c2.y, to_mm.x, to_mm.y)
        }
        _ => PathOp::LineTo(to_mm.x, to_mm.y),
    }
}

/// Converts an anchor/handle point list (points) into millimeter path ops.
///
/// `ClosePath` alone always joins the last anchor to the first with a straight
/// line, which is all a plain `Z` close gives. That flattens a wrap-around
/// segment with handles, so a closed path whose wrap-around segment is curved
/// gets that curve emitted before `ClosePath`. A straight wrap-around is left
/// to `ClosePath` and comes out exactly as a plain `Z` close would.
pub fn path_ops(points: &[PathPoint], closed: bool) -> Vec<PathOp> {
    let Some(first) = points.first() else {
        return Vec::new();
    };
    let start = first.anchor().scaled(PT_TO_MM);
    let mut ops = Vec::with_capacity(points.len() + 2);
    ops.push(PathOp::MoveTo(start.x, start.y));
    for pair in points.windows(2) {
        ops.push(segment(&pair[0], &pair[1]));
    }
    if closed {
        if let Some(last) = points.last()
            && points.len() > 1
            && has_curve(last, first)
        {
            ops.push(segment(last, first));
        }
        ops.push(PathOp::ClosePath);
    }
    ops
}

/// Concatenates all runs. Family, size and color come from the first run
/// that sets them; alignment from the first paragraph that sets one.
fn text_component(paragraphs: &[Paragraph]) -> TextComponent {
    let runs = || paragraphs.iter().flat_map(|p| p.runs.iter());

    let content: String = runs().map(|run| run.text.as_str()).collect();
    let font_family = runs()
        .find_map(|run| run.font_family.as_deref().filter(|f| !f.is_empty()))
        .unwrap_or(DEFAULT_FAMILY)
        .to_string();
    let font_size = runs()
        .find_map(|run| run.font_size.filter(|s| *s > 0.0))
        .unwrap_or(DEFAULT_SIZE_PT);
    let color = runs()
        .find_map(|run| run.color.as_ref())
        .and_then(|paint| color::resolve(Some(paint)))
        .map(Color::from)
        .unwrap_or_default();
    let align_h = paragraphs
        .iter()
        .find_map(|p| p.alignment.clone().filter(|a| !a.is_empty()))
        .map(HAlign::from)
        .unwrap_or_default();

    TextComponent {
        content,
        font_family,
        font_size,
        color,
        align_h,
        align_v: VAlign::Top,
        ..TextComponent::default()
    }
}
