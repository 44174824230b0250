//! Glyph outline extraction.
//!
//! Traces each character's outline into [`PathOp`]s in document millimeters
//! (y down), advancing a pen position by the glyph's horizontal advance.
//! TrueType quadratic segments are raised to cubics; CFF outlines are already
//! cubic and pass through.

use crate::OutlineError;
use labelpress_types::{PT_TO_MM, PathOp, Point};
use ttf_parser::{Face, GlyphId, OutlineBuilder};

/// Millimeters per font unit at `size_pt`.
pub fn scale_for(face: &Face<'_>, size_pt: f64) -> f64 {
    size_pt * PT_TO_MM / f64::from(face.units_per_em().max(1))
}

/// Advance of `ch` in millimeters, or `None` when the font has no glyph for it.
pub fn char_advance(face: &Face<'_>, ch: char, size_pt: f64) -> Option<f64> {
    let gid = face.glyph_index(ch)?;
    Some(f64::from(face.glyph_hor_advance(gid).unwrap_or(0)) * scale_for(face, size_pt))
}

/// Width of `text` in millimeters. Unmapped characters contribute nothing;
/// `letter_spacing_mm` is added between consecutive drawn glyphs.
pub fn text_width(face: &Face<'_>, text: &str, size_pt: f64, letter_spacing_mm: f64) -> f64 {
    let advances: Vec<f64> = text.chars().filter_map(|ch| char_advance(face, ch, size_pt)).collect();
    let gaps = advances.len().saturating_sub(1) as f64;
    advances.iter().sum::<f64>() + gaps * letter_spacing_mm
}

/// Outlines `text` with its baseline starting at `origin`.
pub fn outline_text(face: &Face<'_>, text: &str, size_pt: f64, origin: Point) -> Result<Vec<PathOp>, OutlineError> {
    outline_text_spaced(face, text, size_pt, 0.0, origin)
}

/// Like [`outline_text`], with extra spacing after every glyph.
pub fn outline_text_spaced(
    face: &Face<'_>,
    text: &str,
    size_pt: f64,
    letter_spacing_mm: f64,
    origin: Point,
) -> Result<Vec<PathOp>, OutlineError> {
    if !size_pt.is_finite() || size_pt <= 0.0 {
        return Err(OutlineError::Face(format!("invalid font size {}", size_pt)));
    }
    let scale = scale_for(face, size_pt);
    let mut sink = GlyphSink::new(scale, origin.y);
    let mut drawn = 0usize;

    for ch in text.chars() {
        let Some(gid) = face.glyph_index(ch) else {
            log::debug!("No glyph for {:?}, skipped", ch);
            continue;
        };
        sink.pen_x = origin.x + sink.advanced;
        // Empty glyphs (spaces) return None and only advance the pen.
        face.outline_glyph(gid, &mut sink);
        sink.advanced += advance(face, gid) * scale + letter_spacing_mm;
        drawn += 1;
    }

    if drawn == 0 && !text.trim().is_empty() {
        return Err(OutlineError::MissingGlyphs(text.to_string()));
    }
    Ok(sink.ops)
}

fn advance(face: &Face<'_>, gid: GlyphId) -> f64 {
    f64::from(face.glyph_hor_advance(gid).unwrap_or(0))
}

struct GlyphSink {
    ops: Vec<PathOp>,
    scale: f64,
    baseline: f64,
    pen_x: f64,
    advanced: f64,
    /// Current point in font units, needed to raise quadratics.
    current: (f64, f64),
}

impl GlyphSink {
    fn new(scale: f64, baseline: f64) -> Self {
        Self { ops: Vec::new(), scale, baseline, pen_x: 0.0, advanced: 0.0, current: (0.0, 0.0) }
    }

    fn map(&self, x: f64, y: f64) -> (f64, f64) {
        (self.pen_x + x * self.scale, self.baseline - y * self.scale)
    }
}

impl OutlineBuilder for GlyphSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (px, py) = self.map(x.into(), y.into());
        self.ops.push(PathOp::MoveTo(px, py));
        self.current = (x.into(), y.into());
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (px, py) = self.map(x.into(), y.into());
        self.ops.push(PathOp::LineTo(px, py));
        self.current = (x.into(), y.into());
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x0, y0) = self.current;
        let (qx, qy, x, y) = (f64::from(x1), f64::from(y1), f64::from(x), f64::from(y));
        let c1 = (x0 + 2.0 / 3.0 * (qx - x0), y0 + 2.0 / 3.0 * (qy - y0));
        let c2 = (x + 2.0 / 3.0 * (qx - x), y + 2.0 / 3.0 * (qy - y));
        self.cubic(c1, c2, (x, y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.cubic((x1.into(), y1.into()), (x2.into(), y2.into()), (x.into(), y.into()));
    }

    fn close(&mut self) {
        self.ops.push(PathOp::ClosePath);
    }
}

impl GlyphSink {
    fn cubic(&mut self, c1: (f64, f64), c2: (f64, f64), end: (f64, f64)) {
        let (x1, y1) = self.map(c1.0, c1.1);
        let (x2, y2) = self.map(c2.0, c2.1);
        let (x3, y3) = self.map(end.0, end.1);
        self.ops.push(PathOp::CurveTo(x1, y1, x2, y2, x3, y3));
        self.current = end;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use labelpress_testing::font;

    const EPS: f64 = 1e-9;

    fn with_face<R>(f: impl FnOnce(&Face<'_>) -> R) -> R {
        let bytes = labelpress_testing::test_font_bytes();
        let face = Face::parse(&bytes, 0).unwrap();
        f(&face)
    }

    fn moves(ops: &[PathOp]) -> Vec<(f64, f64)> {
        ops.iter()
            .filter_map(|op| match *op {
                PathOp::MoveTo(x, y) => Some((x, y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_square_glyph_is_scaled_and_flipped() {
        with_face(|face| {
            let ops = outline_text(face, "A", 10.0, Point::new(5.0, 20.0)).unwrap();
            let scale = 10.0 * PT_TO_MM / 1000.0;
            assert!(ops.len() >= 5);
            assert!(matches!(ops.last(), Some(PathOp::ClosePath)));
            let xs: Vec<f64> = ops.iter().flat_map(|op| op.points()).map(|p| p.x).collect();
            let ys: Vec<f64> = ops.iter().flat_map(|op| op.points()).map(|p| p.y).collect();
            let min_x = xs.iter().cloned().fold(f64::INFINITY, f64::min);
            let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            let min_y = ys.iter().cloned().fold(f64::INFINITY, f64::min);
            let max_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            assert!((min_x - (5.0 + 100.0 * scale)).abs() < EPS);
            assert!((max_x - (5.0 + 600.0 * scale)).abs() < EPS);
            // Glyph rises above the baseline, so y shrinks in document space.
            assert!((max_y - 20.0).abs() < EPS);
            assert!((min_y - (20.0 - 700.0 * scale)).abs() < EPS);
        });
    }

    #[test]
    fn test_quadratic_segments_become_cubics() {
        with_face(|face| {
            let ops = outline_text(face, "B", 12.0, Point::new(0.0, 0.0)).unwrap();
            let scale = 12.0 * PT_TO_MM / 1000.0;
            let curve = ops.iter().find_map(|op| match *op {
                PathOp::CurveTo(x1, y1, x2, y2, x3, y3) => Some([x1, y1, x2, y2, x3, y3]),
                _ => None,
            });
            // Quadratic (600,0) -> ctrl (600,700) -> (100,700), raised with the 2/3 rule.
            let expected = [600.0, -700.0 * 2.0 / 3.0, 100.0 + 500.0 * 2.0 / 3.0, -700.0, 100.0, -700.0];
            let got = curve.expect("B has a curved segment");
            for (g, e) in got.iter().zip(expected) {
                assert!((g - e * scale).abs() < EPS, "{:?}", got);
            }
        });
    }

    #[test]
    fn test_cursor_advances_by_glyph_width_and_spacing() {
        with_face(|face| {
            let scale = 10.0 * PT_TO_MM / 1000.0;
            let ops = outline_text_spaced(face, "AA", 10.0, 1.0, Point::new(0.0, 0.0)).unwrap();
            let starts = moves(&ops);
            assert_eq!(starts.len(), 2);
            let expected = f64::from(font::advance(font::GID_A)) * scale + 1.0;
            assert!((starts[1].0 - starts[0].0 - expected).abs() < EPS);
        });
    }

    #[test]
    fn test_counters_produce_two_subpaths() {
        with_face(|face| {
            let ops = outline_text(face, "o", 12.0, Point::new(0.0, 0.0)).unwrap();
            assert_eq!(moves(&ops).len(), 2);
            assert_eq!(ops.iter().filter(|op| matches!(op, PathOp::ClosePath)).count(), 2);
        });
    }

    #[test]
    fn test_composite_glyphs_are_resolved() {
        with_face(|face| {
            let ops = outline_text(face, "C", 10.0, Point::new(0.0, 0.0)).unwrap();
            let scale = 10.0 * PT_TO_MM / 1000.0;
            let (x, _) = moves(&ops)[0];
            assert!((x - 150.0 * scale).abs() < EPS || (x - 650.0 * scale).abs() < EPS);
        });
    }

    #[test]
    fn test_unmapped_characters_are_skipped() {
        with_face(|face| {
            let with_gap = outline_text(face, "A\u{4e2d}A", 10.0, Point::new(0.0, 0.0)).unwrap();
            let plain = outline_text(face, "AA", 10.0, Point::new(0.0, 0.0)).unwrap();
            assert_eq!(with_gap, plain);

            let err = outline_text(face, "\u{4e2d}\u{6587}", 10.0, Point::new(0.0, 0.0)).unwrap_err();
            assert!(matches!(err, OutlineError::MissingGlyphs(_)));
        });
    }

    #[test]
    fn test_spaces_only_advance() {
        with_face(|face| {
            let ops = outline_text(face, "A A", 10.0, Point::new(0.0, 0.0)).unwrap();
            let scale = 10.0 * PT_TO_MM / 1000.0;
            let starts = moves(&ops);
            let gap = f64::from(font::advance(font::GID_A) + font::advance(font::GID_SPACE)) * scale;
            assert!((starts[1].0 - starts[0].0 - gap).abs() < EPS);
            assert!(outline_text(face, "   ", 10.0, Point::new(0.0, 0.0)).unwrap().is_empty());
        });
    }

    #[test]
    fn test_text_width_counts_gaps_between_glyphs() {
        with_face(|face| {
            let scale = 10.0 * PT_TO_MM / 1000.0;
            let plain = f64::from(font::advance(font::GID_A) + font::advance(font::GID_B)) * scale;
            assert!((text_width(face, "AB", 10.0, 0.0) - plain).abs() < EPS);
            assert!((text_width(face, "AB", 10.0, 2.0) - (plain + 2.0)).abs() < EPS);
            assert_eq!(text_width(face, "", 10.0, 2.0), 0.0);
        });
    }
}
