//! Standard-14 font selection and advance widths.
//!
//! Widths are the AFM values for printable ASCII, in 1/1000 em. Oblique and
//! italic faces reuse their upright widths; Courier is monospaced.

/// Base families a missing font falls back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BaseFamily {
    Helvetica,
    Times,
    Courier,
}

impl BaseFamily {
    /// Arial → Helvetica, Times New Roman → Times, Courier New → Courier,
    /// anything else → Helvetica.
    pub fn for_family(family: &str) -> Self {
        let lower = family.trim().to_ascii_lowercase();
        if lower.starts_with("times") {
            BaseFamily::Times
        } else if lower.starts_with("courier") {
            BaseFamily::Courier
        } else {
            BaseFamily::Helvetica
        }
    }

    /// PostScript name of the standard face for the given style.
    pub fn base_font(self, bold: bool, italic: bool) -> &'static str {
        match (self, bold, italic) {
            (BaseFamily::Helvetica, false, false) => "Helvetica",
            (BaseFamily::Helvetica, true, false) => "Helvetica-Bold",
            (BaseFamily::Helvetica, false, true) => "Helvetica-Oblique",
            (BaseFamily::Helvetica, true, true) => "Helvetica-BoldOblique",
            (BaseFamily::Times, false, false) => "Times-Roman",
            (BaseFamily::Times, true, false) => "Times-Bold",
            (BaseFamily::Times, false, true) => "Times-Italic",
            (BaseFamily::Times, true, true) => "Times-BoldItalic",
            (BaseFamily::Courier, false, false) => "Courier",
            (BaseFamily::Courier, true, false) => "Courier-Bold",
            (BaseFamily::Courier, false, true) => "Courier-Oblique",
            (BaseFamily::Courier, true, true) => "Courier-BoldOblique",
        }
    }
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

/// Advance of the WinAnsi byte `code` in 1/1000 em.
pub fn char_width(family: BaseFamily, bold: bool, code: u8) -> u16 {
    let table = match (family, bold) {
        (BaseFamily::Courier, _) => return 600,
        (BaseFamily::Helvetica, false) => &HELVETICA,
        (BaseFamily::Helvetica, true) => &HELVETICA_BOLD,
        (BaseFamily::Times, false) => &TIMES_ROMAN,
        (BaseFamily::Times, true) => &TIMES_BOLD,
    };
    if (32..=126).contains(&code) {
        table[usize::from(code - 32)]
    } else {
        // 'n' stands in for accented and other non-ASCII characters.
        table[usize::from(b'n' - 32)]
    }
}
