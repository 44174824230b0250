//! A tiny, hand-assembled TrueType font.
//!
//! Glyph set (units per em 1000):
//!
//! | gid | char | outline                                          | advance |
//! |-----|------|--------------------------------------------------|---------|
//! | 0   |      | empty `.notdef`                                  | 500     |
//! | 1   | `A`  | square 100..600 x 0..700                         | 700     |
//! | 2   | `B`  | two lines and one quadratic segment              | 700     |
//! | 3   | `o`  | outer square 0..500 with inner square 125..375   | 550     |
//! | 4   | ` `  | empty                                            | 250     |
//! | 5   | `C`  | composite: glyph 1 shifted by (50, 0)            | 750     |

pub const FAMILY: &str = "Test Sans";
pub const POSTSCRIPT_NAME: &str = "TestSans-Regular";
pub const UNITS_PER_EM: u16 = 1000;

pub const GID_A: u16 = 1;
pub const GID_B: u16 = 2;
pub const GID_O: u16 = 3;
pub const GID_SPACE: u16 = 4;
pub const GID_C: u16 = 5;

const ADVANCES: [(u16, i16); 6] = [(500, 0), (700, 100), (700, 100), (550, 0), (250, 0), (750, 150)];

/// Advance width of a glyph in font units.
pub fn advance(gid: u16) -> u16 {
    ADVANCES.get(gid as usize).map(|(adv, _)| *adv).unwrap_or(0)
}

type Contour<'a> = &'a [(i16, i16, bool)];

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn pad4(out: &mut Vec<u8>) {
    while out.len() % 4 != 0 {
        out.push(0);
    }
}

fn simple_glyph(contours: &[Contour<'_>]) -> Vec<u8> {
    let points: Vec<(i16, i16, bool)> = contours.iter().flat_map(|c| c.iter().copied()).collect();
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);

    let mut out = Vec::new();
    push_i16(&mut out, contours.len() as i16);
    push_i16(&mut out, x_min);
    push_i16(&mut out, y_min);
    push_i16(&mut out, x_max);
    push_i16(&mut out, y_max);

    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        push_u16(&mut out, end - 1);
    }
    push_u16(&mut out, 0); // instructionLength

    for (_, _, on_curve) in &points {
        out.push(if *on_curve { 0x01 } else { 0x00 });
    }
    let mut prev = 0i16;
    for (x, _, _) in &points {
        push_i16(&mut out, x - prev);
        prev = *x;
    }
    prev = 0;
    for (_, y, _) in &points {
        push_i16(&mut out, y - prev);
        prev = *y;
    }
    pad4(&mut out);
    out
}

fn composite_glyph(component: u16, dx: i16, dy: i16, bbox: (i16, i16, i16, i16)) -> Vec<u8> {
    const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
    const ARGS_ARE_XY_VALUES: u16 = 0x0002;

    let mut out = Vec::new();
    push_i16(&mut out, -1);
    push_i16(&mut out, bbox.0);
    push_i16(&mut out, bbox.1);
    push_i16(&mut out, bbox.2);
    push_i16(&mut out, bbox.3);
    push_u16(&mut out, ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES);
    push_u16(&mut out, component);
    push_i16(&mut out, dx);
    push_i16(&mut out, dy);
    pad4(&mut out);
    out
}

fn glyphs() -> Vec<Vec<u8>> {
    let square: Contour<'_> = &[(100, 0, true), (600, 0, true), (600, 700, true), (100, 700, true)];
    let curved: Contour<'_> = &[(100, 0, true), (600, 0, true), (600, 700, false), (100, 700, true)];
    let outer: Contour<'_> = &[(0, 0, true), (500, 0, true), (500, 500, true), (0, 500, true)];
    let inner: Contour<'_> = &[(125, 125, true), (375, 125, true), (375, 375, true), (125, 375, true)];

    vec![
        Vec::new(),
        simple_glyph(&[square]),
        simple_glyph(&[curved]),
        simple_glyph(&[outer, inner]),
        Vec::new(),
        composite_glyph(GID_A, 50, 0, (150, 0, 650, 700)),
    ]
}

fn glyf_and_loca() -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut loca = Vec::new();
    for glyph in glyphs() {
        push_u32(&mut loca, glyf.len() as u32);
        glyf.extend_from_slice(&glyph);
    }
    push_u32(&mut loca, glyf.len() as u32);
    (glyf, loca)
}

fn head() -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000); // version
    push_u32(&mut out, 0x0001_0000); // fontRevision
    push_u32(&mut out, 0); // checkSumAdjustment
    push_u32(&mut out, 0x5F0F_3CF5); // magicNumber
    push_u16(&mut out, 0x000B); // flags
    push_u16(&mut out, UNITS_PER_EM);
    out.extend_from_slice(&[0u8; 16]); // created, modified
    push_i16(&mut out, 0);
    push_i16(&mut out, 0);
    push_i16(&mut out, 650);
    push_i16(&mut out, 700);
    push_u16(&mut out, 0); // macStyle
    push_u16(&mut out, 8); // lowestRecPPEM
    push_i16(&mut out, 2); // fontDirectionHint
    push_i16(&mut out, 1); // indexToLocFormat: long offsets
    push_i16(&mut out, 0); // glyphDataFormat
    out
}

fn hhea() -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_i16(&mut out, 800); // ascender
    push_i16(&mut out, -200); // descender
    push_i16(&mut out, 0); // lineGap
    push_u16(&mut out, 750); // advanceWidthMax
    push_i16(&mut out, 0); // minLeftSideBearing
    push_i16(&mut out, 0); // minRightSideBearing
    push_i16(&mut out, 650); // xMaxExtent
    push_i16(&mut out, 1); // caretSlopeRise
    push_i16(&mut out, 0); // caretSlopeRun
    push_i16(&mut out, 0); // caretOffset
    out.extend_from_slice(&[0u8; 8]);
    push_i16(&mut out, 0); // metricDataFormat
    push_u16(&mut out, ADVANCES.len() as u16);
    out
}

fn hmtx() -> Vec<u8> {
    let mut out = Vec::new();
    for (advance, lsb) in ADVANCES {
        push_u16(&mut out, advance);
        push_i16(&mut out, lsb);
    }
    out
}

fn maxp() -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x0000_5000);
    push_u16(&mut out, ADVANCES.len() as u16);
    out
}

fn cmap() -> Vec<u8> {
    // (start char, end char, start glyph)
    let groups: [(u32, u32, u32); 4] = [(0x20, 0x20, 4), (0x41, 0x42, 1), (0x43, 0x43, 5), (0x6F, 0x6F, 3)];

    let mut out = Vec::new();
    push_u16(&mut out, 0); // version
    push_u16(&mut out, 1); // numTables
    push_u16(&mut out, 3); // platform: Windows
    push_u16(&mut out, 10); // encoding: Unicode full repertoire
    push_u32(&mut out, 12); // subtable offset

    push_u16(&mut out, 12); // format
    push_u16(&mut out, 0);
    push_u32(&mut out, 16 + 12 * groups.len() as u32);
    push_u32(&mut out, 0); // language
    push_u32(&mut out, groups.len() as u32);
    for (start, end, glyph) in groups {
        push_u32(&mut out, start);
        push_u32(&mut out, end);
        push_u32(&mut out, glyph);
    }
    out
}

fn name() -> Vec<u8> {
    let records: [(u16, &str); 4] = [(1, FAMILY), (2, "Regular"), (4, "Test Sans Regular"), (6, POSTSCRIPT_NAME)];

    let mut storage = Vec::new();
    let mut out = Vec::new();
    push_u16(&mut out, 0); // format
    push_u16(&mut out, records.len() as u16);
    push_u16(&mut out, 6 + 12 * records.len() as u16);
    for (name_id, value) in records {
        let encoded: Vec<u8> = value.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
        push_u16(&mut out, 3); // platform: Windows
        push_u16(&mut out, 1); // encoding: Unicode BMP
        push_u16(&mut out, 0x0409); // language: en-US
        push_u16(&mut out, name_id);
        push_u16(&mut out, encoded.len() as u16);
        push_u16(&mut out, storage.len() as u16);
        storage.extend_from_slice(&encoded);
    }
    out.extend_from_slice(&storage);
    out
}

fn post() -> Vec<u8> {
    let mut out = Vec::new();
    push_u32(&mut out, 0x0003_0000);
    push_u32(&mut out, 0); // italicAngle
    push_i16(&mut out, -100); // underlinePosition
    push_i16(&mut out, 50); // underlineThickness
    push_u32(&mut out, 0); // isFixedPitch
    out.extend_from_slice(&[0u8; 16]);
    out
}

fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

/// Assembles the font file.
pub fn test_font_bytes() -> Vec<u8> {
    let (glyf, loca) = glyf_and_loca();
    // Table records must be sorted by tag.
    let tables: Vec<(&[u8; 4], Vec<u8>)> = vec![
        (b"cmap", cmap()),
        (b"glyf", glyf),
        (b"head", head()),
        (b"hhea", hhea()),
        (b"hmtx", hmtx()),
        (b"loca", loca),
        (b"maxp", maxp()),
        (b"name", name()),
        (b"post", post()),
    ];

    let num_tables = tables.len() as u16;
    let entry_selector = 15 - num_tables.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * 16;

    let mut out = Vec::new();
    push_u32(&mut out, 0x0001_0000);
    push_u16(&mut out, num_tables);
    push_u16(&mut out, search_range);
    push_u16(&mut out, entry_selector);
    push_u16(&mut out, num_tables * 16 - search_range);

    let mut offset = 12 + 16 * tables.len();
    let mut body = Vec::new();
    for (tag, data) in &tables {
        out.extend_from_slice(*tag);
        push_u32(&mut out, checksum(data));
        push_u32(&mut out, offset as u32);
        push_u32(&mut out, data.len() as u32);

        body.extend_from_slice(data);
        pad4(&mut body);
        offset = 12 + 16 * tables.len() + body.len();
    }
    out.extend_from_slice(&body);
    out
}
