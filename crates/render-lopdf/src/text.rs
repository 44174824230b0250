//! Text components: editable text and filled glyph outlines.

use crate::canvas::PageCanvas;
use crate::error::RenderError;
use crate::fonts::PdfFont;
use crate::page::DrawContext;
use labelpress_layout::OutlineError;
use labelpress_layout::text::{outline, place_lines};
use labelpress_types::{Component, ExportWarning, PT_TO_MM, PathOp, Point, TextComponent};

pub(crate) fn draw_text(
    ctx: &mut DrawContext<'_>,
    canvas: &mut PageCanvas,
    component: &Component,
    text: &TextComponent,
) -> Result<(), RenderError> {
    if text.content.trim().is_empty() {
        return Ok(());
    }
    if ctx.options.outlined {
        match outline_component(ctx, component, text) {
            Ok(ops) => {
                fill_outlines(canvas, text, &ops);
                return Ok(());
            }
            Err(err @ OutlineError::Font(_)) => {
                log::warn!("No outline font for '{}' ({}), keeping text editable", text.font_family, err);
                ctx.warn(ExportWarning::GlyphOutlineFailure { component: component.id.clone(), message: err.to_string() });
            }
            Err(err) => {
                log::warn!("Outlining {:?} failed: {}", component.id, err);
                ctx.warn(ExportWarning::GlyphOutlineFailure { component: component.id.clone(), message: err.to_string() });
            }
        }
    }
    draw_editable(ctx, canvas, component, text)
}

/// Draws `text` as real text objects, one `BT`/`ET` block per line.
pub(crate) fn draw_editable(
    ctx: &mut DrawContext<'_>,
    canvas: &mut PageCanvas,
    component: &Component,
    text: &TextComponent,
) -> Result<(), RenderError> {
    let font = select_font(ctx, text)?;
    let size = text.font_size;
    let spacing = text.letter_spacing;

    let mut measure_error = None;
    let lines = place_lines(text, component.frame(), |line| match ctx.fonts.text_width(&font, line, size, spacing) {
        Ok(width) => width * PT_TO_MM,
        Err(err) => {
            measure_error.get_or_insert(err);
            0.0
        }
    });
    if let Some(err) = measure_error {
        return Err(err);
    }

    for line in lines {
        let origin = canvas.to_page(line.x, line.baseline);
        canvas.push("BT", vec![]);
        canvas.push("Tf", vec![font.resource.as_str().into(), size.into()]);
        canvas.fill_color(text.color.rgb());
        if spacing == 0.0 {
            set_text_matrix(canvas, origin);
            let encoded = ctx.fonts.encode(&font, line.text)?;
            canvas.push("Tj", vec![encoded]);
        } else {
            let mut x = origin.x;
            for ch in line.text.chars() {
                let mut buf = [0u8; 4];
                set_text_matrix(canvas, Point::new(x, origin.y));
                let encoded = ctx.fonts.encode(&font, ch.encode_utf8(&mut buf))?;
                canvas.push("Tj", vec![encoded]);
                x += ctx.fonts.char_advance(&font, ch, size)? + spacing;
            }
        }
        canvas.push("ET", vec![]);
    }
    Ok(())
}

fn set_text_matrix(canvas: &mut PageCanvas, origin: Point) {
    canvas.push("Tm", vec![1.into(), 0.into(), 0.into(), 1.into(), origin.x.into(), origin.y.into()]);
}

/// The embedded font for `text`, or its standard-14 stand-in.
fn select_font(ctx: &mut DrawContext<'_>, text: &TextComponent) -> Result<PdfFont, RenderError> {
    if text.font_family.trim().is_empty() && text.font_id.is_none() {
        return Ok(ctx.fonts.base(&text.font_family, text.bold, text.italic));
    }
    match ctx.library.resolve(&text.font_family, text.font_id.as_deref()) {
        Ok(font) => ctx.fonts.embed(font),
        Err(err) => {
            let fallback = ctx.fonts.base(&text.font_family, text.bold, text.italic);
            let fallback_name = fallback.base_font().unwrap_or_default().to_string();
            log::warn!("{}; falling back to {}", err, fallback_name);
            ctx.warn(ExportWarning::MissingFontFile {
                family: text.font_family.clone(),
                font_id: text.font_id.clone(),
                fallback: fallback_name,
            });
            Ok(fallback)
        }
    }
}

/// Outlines every placed line of `text` into one list of path ops.
fn outline_component(
    ctx: &DrawContext<'_>,
    component: &Component,
    text: &TextComponent,
) -> Result<Vec<PathOp>, OutlineError> {
    let font = ctx.library.resolve_for_outline(&text.font_family, text.font_id.as_deref(), text.bold, text.italic)?;
    let face = font.face()?;
    let spacing_mm = text.letter_spacing * PT_TO_MM;

    let mut ops = Vec::new();
    for line in place_lines(text, component.frame(), |line| outline::text_width(&face, line, text.font_size, spacing_mm)) {
        let origin = Point::new(line.x, line.baseline);
        ops.extend(outline::outline_text_spaced(&face, line.text, text.font_size, spacing_mm, origin)?);
    }
    log::debug!("Outlined {:?} with '{}' into {} ops", component.id, font.postscript_name, ops.len());
    Ok(ops)
}

fn fill_outlines(canvas: &mut PageCanvas, text: &TextComponent, ops: &[PathOp]) {
    if ops.is_empty() {
        return;
    }
    canvas.fill_color(text.color.rgb());
    canvas.path(ops);
    canvas.push("f*", vec![]);
}
