//! Drawing one composed label onto one page.

use crate::canvas::PageCanvas;
use crate::error::RenderError;
use crate::fonts::DocumentFonts;
use crate::images::{DocumentImages, fit_rect};
use crate::options::RenderOptions;
use crate::text;
use labelpress_layout::SharedFontLibrary;
use labelpress_types::{
    Affine, BoundsRect, Component, ComponentKind, ExportWarning, ImageComponent, ImageFit, MM_TO_PT, PathComponent,
    Rect, Rgb,
};
use lopdf::content::Content;
use lopdf::{Document, Object};

/// Gap between the page's right edge and the layer separator mark, in points.
const SEPARATOR_OFFSET: f64 = 5.0;
const SEPARATOR_WIDTH: f64 = 0.5;
const GUIDE_DASH: [i64; 2] = [3, 2];
const GUIDE_LINE_WIDTH: f64 = 0.25;
const GUIDE_COLOR: Rgb = Rgb { r: 0.5, g: 0.5, b: 0.5 };

/// Document-wide state a page draws into.
pub(crate) struct DrawContext<'a> {
    pub doc: &'a mut Document,
    pub fonts: &'a mut DocumentFonts,
    pub images: &'a mut DocumentImages,
    pub library: &'a SharedFontLibrary,
    pub options: &'a RenderOptions,
    pub warnings: &'a mut Vec<ExportWarning>,
}

impl DrawContext<'_> {
    /// Records a warning once per document.
    pub fn warn(&mut self, warning: ExportWarning) {
        if !self.warnings.contains(&warning) {
            self.warnings.push(warning);
        }
    }
}

/// One entry of the paint sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step<'a> {
    Draw(&'a Component),
    Separator,
}

/// Paint order for `components`.
///
/// Without layering this is list order. With it: hidden paths, the separator
/// (only when there are both hidden and visible paths), visible paths, then
/// every non-path component, each group in list order.
pub(crate) fn paint_order(components: &[Component], layered: bool) -> Vec<Step<'_>> {
    if !layered {
        return components.iter().map(Step::Draw).collect();
    }
    let (paths, others): (Vec<&Component>, Vec<&Component>) = components.iter().partition(|c| c.is_path());
    let (visible, hidden): (Vec<&Component>, Vec<&Component>) = paths.into_iter().partition(|c| c.visible);

    let mut steps: Vec<Step<'_>> = hidden.iter().copied().map(Step::Draw).collect();
    if !hidden.is_empty() && !visible.is_empty() {
        steps.push(Step::Separator);
    }
    steps.extend(visible.into_iter().map(Step::Draw));
    steps.extend(others.into_iter().map(Step::Draw));
    steps
}

/// Draws `components` and the bounds-rect guides on a page of
/// `width_mm`×`height_mm`.
pub(crate) fn draw_page(
    ctx: &mut DrawContext<'_>,
    width_mm: f64,
    height_mm: f64,
    components: &[Component],
    rects: &[BoundsRect],
) -> Result<Content, RenderError> {
    let page_width = width_mm * MM_TO_PT;
    let mut canvas = PageCanvas::new(height_mm * MM_TO_PT);

    for step in paint_order(components, ctx.options.layered()) {
        match step {
            Step::Draw(component) => draw_component(ctx, &mut canvas, component, rects)?,
            Step::Separator => draw_separator(&mut canvas, page_width),
        }
    }
    for rect in rects {
        draw_guide(&mut canvas, rect);
    }
    Ok(canvas.into_content())
}

/// The nested transforms for a component: its bounds rect's rotation first,
/// then its own. Zero rotations contribute no save at all.
pub(crate) fn rotation_stack(canvas: &PageCanvas, component: &Component, rects: &[BoundsRect]) -> Vec<Affine> {
    let mut stack = Vec::with_capacity(2);
    if let Some(rect) = component.bounds_rect.and_then(|i| rects.get(i))
        && rect.rotation != 0.0
    {
        let center = rect.rect().center();
        // The authoring y axis points down, so angles flip on the page.
        stack.push(Affine::rotate_about(-rect.rotation, canvas.to_page(center.x, center.y)));
    }
    if component.rotation != 0.0 {
        let center = component.centroid();
        stack.push(Affine::rotate_about(-component.rotation, canvas.to_page(center.x, center.y)));
    }
    stack
}

fn draw_component(
    ctx: &mut DrawContext<'_>,
    canvas: &mut PageCanvas,
    component: &Component,
    rects: &[BoundsRect],
) -> Result<(), RenderError> {
    let transforms = rotation_stack(canvas, component, rects);
    canvas.with_transforms(&transforms, |canvas| match &component.kind {
        ComponentKind::Path(path) => {
            draw_path(canvas, path);
            Ok(())
        }
        ComponentKind::Text(t) | ComponentKind::TextRegion(t) => text::draw_text(ctx, canvas, component, t),
        ComponentKind::Image(image) => draw_image(ctx, canvas, component, image),
        ComponentKind::Qr(_) | ComponentKind::Barcode(_) => {
            log::warn!("{} component {:?} skipped, no symbology renderer", component.type_name(), component.id);
            ctx.warn(ExportWarning::UnsupportedComponent {
                component: component.id.clone(),
                kind: component.type_name().to_string(),
            });
            Ok(())
        }
    })
}

fn draw_path(canvas: &mut PageCanvas, path: &PathComponent) {
    let data = &path.path_data;
    if data.ops.is_empty() || (data.fill.is_none() && data.stroke.is_none()) {
        return;
    }
    if let Some(fill) = &data.fill {
        canvas.fill_color(fill.rgb());
    }
    if let Some(stroke) = &data.stroke {
        canvas.stroke_color(stroke.rgb());
        canvas.push("w", vec![(data.lw * MM_TO_PT).into()]);
    }
    canvas.path(&data.ops);
    let operator = match (data.fill.is_some(), data.stroke.is_some(), path.is_compound) {
        (true, true, true) => "B*",
        (true, true, false) => "B",
        (true, false, true) => "f*",
        (true, false, false) => "f",
        (false, _, _) => "S",
    };
    canvas.push(operator, vec![]);
}

fn draw_image(
    ctx: &mut DrawContext<'_>,
    canvas: &mut PageCanvas,
    component: &Component,
    image: &ImageComponent,
) -> Result<(), RenderError> {
    let placed = match ctx.images.get_or_insert(ctx.doc, &image.image_url) {
        Ok(placed) => placed,
        Err(err) => {
            log::warn!("Image of {:?} unavailable: {}", component.id, err);
            ctx.warn(ExportWarning::ImageUnavailable { component: component.id.clone(), message: err.to_string() });
            return Ok(());
        }
    };

    let frame = component.frame();
    let target = fit_rect(frame, placed.width, placed.height, image.image_fit);
    let mut outer = canvas.save(Affine::IDENTITY);
    if image.image_fit == ImageFit::Cover {
        rect_path(&mut outer, frame);
        outer.push("W", vec![]);
        outer.push("n", vec![]);
    }
    let origin = outer.to_page(target.x, target.bottom());
    let placement = Affine {
        a: target.width * MM_TO_PT,
        b: 0.0,
        c: 0.0,
        d: target.height * MM_TO_PT,
        e: origin.x,
        f: origin.y,
    };
    let mut inner = outer.save(placement);
    inner.push("Do", vec![Object::Name(placed.resource.into_bytes())]);
    Ok(())
}

/// `re` for a document-space rect.
fn rect_path(canvas: &mut PageCanvas, rect: Rect) {
    let origin = canvas.to_page(rect.x, rect.bottom());
    canvas.push(
        "re",
        vec![origin.x.into(), origin.y.into(), (rect.width * MM_TO_PT).into(), (rect.height * MM_TO_PT).into()],
    );
}

/// Thin red bar just right of the page, marking where hidden paths end.
fn draw_separator(canvas: &mut PageCanvas, page_width: f64) {
    let height = canvas.page_height();
    let mut guard = canvas.save(Affine::IDENTITY);
    guard.fill_color(Rgb::RED);
    guard.push(
        "re",
        vec![(page_width + SEPARATOR_OFFSET).into(), 0.into(), SEPARATOR_WIDTH.into(), height.into()],
    );
    guard.push("f", vec![]);
}

/// Dashed, unfilled outline of a bounds rect, rotated like its contents.
fn draw_guide(canvas: &mut PageCanvas, rect: &BoundsRect) {
    let center = rect.rect().center();
    let rotation = if rect.rotation != 0.0 {
        Affine::rotate_about(-rect.rotation, canvas.to_page(center.x, center.y))
    } else {
        Affine::IDENTITY
    };
    let mut guard = canvas.save(rotation);
    guard.stroke_color(GUIDE_COLOR);
    guard.push("w", vec![GUIDE_LINE_WIDTH.into()]);
    guard.push("d", vec![GUIDE_DASH.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>().into(), 0.into()]);
    rect_path(&mut guard, rect.rect());
    guard.push("S", vec![]);
}
