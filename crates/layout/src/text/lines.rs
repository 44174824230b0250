//! Line placement for text boxes.
//!
//! Both editable and outlined text share this placement so the two modes put
//! baselines at the same spot. Everything is in document millimeters with y
//! growing downward; `baseline` is the y of each line's baseline.

use labelpress_types::{HAlign, PT_TO_MM, Rect, TextComponent, VAlign};

/// Baseline inset of the first line below the box top, as a fraction of the font size.
const ASCENT_RATIO: f64 = 0.8;
/// Baseline lift above the box bottom, as a fraction of the font size.
const DESCENT_RATIO: f64 = 0.2;
const LINE_HEIGHT_RATIO: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine<'a> {
    /// Index of the line in the content, counting empty lines.
    pub index: usize,
    pub text: &'a str,
    pub x: f64,
    pub baseline: f64,
    pub width: f64,
}

/// Line height in millimeters: 1.2 × font size plus the letter spacing.
pub fn line_height(text: &TextComponent) -> f64 {
    (text.font_size * LINE_HEIGHT_RATIO + text.letter_spacing) * PT_TO_MM
}

/// Splits content on explicit line breaks (`\n`, tolerating `\r\n`).
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line)).collect()
}

/// Places every non-empty line of `text` inside `frame`. `measure` returns a
/// line's width in millimeters.
pub fn place_lines<'a>(text: &'a TextComponent, frame: Rect, mut measure: impl FnMut(&str) -> f64) -> Vec<PlacedLine<'a>> {
    let lines = split_lines(&text.content);
    let size = text.font_size * PT_TO_MM;
    let lh = line_height(text);
    let total = lines.len() as f64 * lh;

    let first = match text.align_v {
        VAlign::Top => frame.y + size * ASCENT_RATIO,
        VAlign::Bottom => frame.bottom() - (total - lh) - size * DESCENT_RATIO,
        VAlign::Center => frame.y + frame.height / 2.0 + total / 2.0 - size * DESCENT_RATIO - (total - lh),
    };

    lines
        .into_iter()
        .enumerate()
        .filter(|(_, line)| !line.is_empty())
        .map(|(index, line)| {
            let width = measure(line);
            let x = match text.align_h {
                HAlign::Left => frame.x,
                HAlign::Center => frame.x + frame.width / 2.0 - width / 2.0,
                HAlign::Right => frame.right() - width,
            };
            PlacedLine { index, text: line, x, baseline: first + index as f64 * lh, width }
        })
        .collect()
}
