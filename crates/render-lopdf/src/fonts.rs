//! Per-document font resources.
//!
//! Two kinds of fonts end up in a document: standard-14 Type1 fonts used as
//! fallbacks (WinAnsi-encoded, not embedded) and resolved font files embedded
//! as Type0/CID fonts with Identity-H encoding. Embedded text is written as
//! 2-byte glyph ids, and every glyph used is recorded so the widths array and
//! the ToUnicode map can be emitted when the document is finished.

use crate::error::RenderError;
use crate::metrics::{self, BaseFamily};
use crate::options::FontEmbedding;
use crate::subset;
use labelpress_layout::LoadedFont;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

/// A font selected for drawing, addressed by its resource name (`/F1`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct PdfFont {
    pub resource: String,
    kind: PdfFontKind,
}

#[derive(Debug, Clone, PartialEq)]
enum PdfFontKind {
    Base { family: BaseFamily, bold: bool, base_font: &'static str },
    Embedded { index: usize },
}

impl PdfFont {
    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, PdfFontKind::Embedded { .. })
    }

    /// PostScript name of a standard font, `None` for embedded fonts.
    pub fn base_font(&self) -> Option<&'static str> {
        match self.kind {
            PdfFontKind::Base { base_font, .. } => Some(base_font),
            PdfFontKind::Embedded { .. } => None,
        }
    }
}

struct EmbeddedFont {
    resource: String,
    font: Arc<LoadedFont>,
    used: BTreeMap<u16, char>,
}

pub struct DocumentFonts {
    embedding: FontEmbedding,
    base: BTreeMap<&'static str, String>,
    embedded: Vec<EmbeddedFont>,
    by_path: HashMap<PathBuf, usize>,
    next_id: usize,
}

impl DocumentFonts {
    pub fn new(embedding: FontEmbedding) -> Self {
        Self { embedding, base: BTreeMap::new(), embedded: Vec::new(), by_path: HashMap::new(), next_id: 1 }
    }

    fn next_resource(&mut self) -> String {
        let name = format!("F{}", self.next_id);
        self.next_id += 1;
        name
    }

    /// The standard-14 face standing in for `family`.
    pub fn base(&mut self, family: &str, bold: bool, italic: bool) -> PdfFont {
        let base_family = BaseFamily::for_family(family);
        let base_font = base_family.base_font(bold, italic);
        let resource = match self.base.get(base_font) {
            Some(resource) => resource.clone(),
            None => {
                let resource = self.next_resource();
                self.base.insert(base_font, resource.clone());
                resource
            }
        };
        PdfFont { resource, kind: PdfFontKind::Base { family: base_family, bold, base_font } }
    }

    /// Registers a resolved font file for embedding. The same file maps to the
    /// same resource for the whole document.
    pub fn embed(&mut self, font: Arc<LoadedFont>) -> Result<PdfFont, RenderError> {
        if let Some(&index) = self.by_path.get(&font.path) {
            return Ok(PdfFont { resource: self.embedded[index].resource.clone(), kind: PdfFontKind::Embedded { index } });
        }
        font.face()?;
        let resource = self.next_resource();
        let index = self.embedded.len();
        log::debug!("Embedding font '{}' as /{}", font.postscript_name, resource);
        self.by_path.insert(font.path.clone(), index);
        self.embedded.push(EmbeddedFont { resource: resource.clone(), font, used: BTreeMap::new() });
        Ok(PdfFont { resource, kind: PdfFontKind::Embedded { index } })
    }

    /// Encodes `text` for a `Tj` operand, recording glyph usage.
    pub fn encode(&mut self, font: &PdfFont, text: &str) -> Result<Object, RenderError> {
        match font.kind {
            PdfFontKind::Base { .. } => Ok(Object::String(to_win_ansi(text), StringFormat::Literal)),
            PdfFontKind::Embedded { index } => {
                let entry = &mut self.embedded[index];
                let face = entry.font.face()?;
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for ch in text.chars() {
                    let gid = face.glyph_index(ch).map(|g| g.0).unwrap_or(0);
                    entry.used.entry(gid).or_insert(ch);
                    bytes.extend_from_slice(&gid.to_be_bytes());
                }
                Ok(Object::String(bytes, StringFormat::Hexadecimal))
            }
        }
    }

    /// Advance of `ch` in points at `size`.
    pub fn char_advance(&self, font: &PdfFont, ch: char, size: f64) -> Result<f64, RenderError> {
        match font.kind {
            PdfFontKind::Base { family, bold, .. } => {
                Ok(f64::from(metrics::char_width(family, bold, win_ansi_byte(ch))) * size / 1000.0)
            }
            PdfFontKind::Embedded { index } => {
                let face = self.embedded[index].font.face()?;
                let gid = face.glyph_index(ch).unwrap_or(ttf_parser::GlyphId(0));
                let advance = f64::from(face.glyph_hor_advance(gid).unwrap_or(0));
                Ok(advance * size / f64::from(face.units_per_em().max(1)))
            }
        }
    }

    /// Width of `text` in points with `spacing` points between glyphs.
    pub fn text_width(&self, font: &PdfFont, text: &str, size: f64, spacing: f64) -> Result<f64, RenderError> {
        let mut width = 0.0;
        for ch in text.chars() {
            width += self.char_advance(font, ch, size)?;
        }
        Ok(width + text.chars().count().saturating_sub(1) as f64 * spacing)
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.embedded.is_empty()
    }

    /// Writes every font object into `doc` and returns the `/Font` resource
    /// dictionary.
    pub fn write(&self, doc: &mut Document) -> Result<Dictionary, RenderError> {
        let mut resources = Dictionary::new();
        for (base_font, resource) in &self.base {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => *base_font,
                "Encoding" => "WinAnsiEncoding",
            });
            resources.set(resource.as_bytes(), font_id);
        }
        for entry in &self.embedded {
            let font_id = self.write_embedded(doc, entry)?;
            resources.set(entry.resource.as_bytes(), font_id);
        }
        Ok(resources)
    }

    fn write_embedded(&self, doc: &mut Document, entry: &EmbeddedFont) -> Result<ObjectId, RenderError> {
        let data = entry.font.data.as_slice();
        let face = entry.font.face()?;
        let units = f64::from(face.units_per_em().max(1));
        let to_pdf = |v: f64| (v * 1000.0 / units).round() as i64;
        let truetype = subset::has_glyf_outlines(data);
        let postscript_name: String = entry.font.postscript_name.chars().filter(|c| !c.is_whitespace()).collect();

        let full = !truetype || self.embedding.embeds_full(entry.font.file_size());
        let (program, base_font) = if full {
            (data.to_vec(), postscript_name)
        } else {
            let glyphs: BTreeSet<u16> = entry.used.keys().copied().collect();
            match subset::subset_truetype(data, &glyphs) {
                Ok(program) => (program, format!("{}+{}", subset_tag(&glyphs), postscript_name)),
                Err(e) => {
                    log::warn!("Subsetting '{}' failed ({}), embedding the full font", postscript_name, e);
                    (data.to_vec(), postscript_name)
                }
            }
        };
        log::debug!(
            "Font /{} embedded {} ({} bytes, {} glyphs used)",
            entry.resource,
            if full { "in full" } else { "as subset" },
            program.len(),
            entry.used.len()
        );

        let (file_key, file_id) = if truetype {
            let length1 = program.len() as i64;
            ("FontFile2", doc.add_object(Stream::new(dictionary! { "Length1" => length1 }, program)))
        } else {
            ("FontFile3", doc.add_object(Stream::new(dictionary! { "Subtype" => "OpenType" }, program)))
        };

        let mut flags = 32i64;
        if face.is_monospaced() {
            flags |= 1;
        }
        if face.is_italic() {
            flags |= 64;
        }
        let bbox = face.global_bounding_box();
        let ascent = to_pdf(f64::from(face.ascender()));
        let missing_width = to_pdf(f64::from(face.glyph_hor_advance(ttf_parser::GlyphId(0)).unwrap_or(0)));
        let descriptor_id = doc.add_object(dictionary! {
            "Type" => "FontDescriptor",
            "FontName" => Object::Name(base_font.as_bytes().to_vec()),
            "Flags" => flags,
            "FontBBox" => vec![
                to_pdf(f64::from(bbox.x_min)).into(),
                to_pdf(f64::from(bbox.y_min)).into(),
                to_pdf(f64::from(bbox.x_max)).into(),
                to_pdf(f64::from(bbox.y_max)).into(),
            ],
            "ItalicAngle" => f64::from(face.italic_angle()),
            "Ascent" => ascent,
            "Descent" => to_pdf(f64::from(face.descender())),
            "CapHeight" => face.capital_height().map(|h| to_pdf(f64::from(h))).unwrap_or(ascent),
            "StemV" => 80,
            "MissingWidth" => missing_width,
            file_key => file_id,
        });

        let mut widths = Vec::with_capacity(entry.used.len() * 2);
        for &gid in entry.used.keys() {
            let advance = f64::from(face.glyph_hor_advance(ttf_parser::GlyphId(gid)).unwrap_or(0));
            widths.push(Object::Integer(i64::from(gid)));
            widths.push(Object::Array(vec![Object::Integer(to_pdf(advance))]));
        }

        let mut cid_font = dictionary! {
            "Type" => "Font",
            "Subtype" => if truetype { "CIDFontType2" } else { "CIDFontType0" },
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "FontDescriptor" => descriptor_id,
            "DW" => missing_width,
            "W" => widths,
        };
        if truetype {
            cid_font.set("CIDToGIDMap", "Identity");
        }
        let cid_font_id = doc.add_object(cid_font);

        let to_unicode_id = doc.add_object(Stream::new(Dictionary::new(), to_unicode_cmap(&entry.used).into_bytes()));

        Ok(doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![cid_font_id.into()],
            "ToUnicode" => to_unicode_id,
        }))
    }
}

/// Six uppercase letters derived from the glyph set, as subset prefixes require.
fn subset_tag(glyphs: &BTreeSet<u16>) -> String {
    let mut hash: u32 = 2166136261;
    for gid in glyphs {
        for byte in gid.to_be_bytes() {
            hash = (hash ^ u32::from(byte)).wrapping_mul(16777619);
        }
    }
    (0..6)
        .map(|i| {
            let letter = (hash >> (i * 5)) % 26;
            char::from(b'A' + letter as u8)
        })
        .collect()
}

fn to_unicode_cmap(used: &BTreeMap<u16, char>) -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n\
         12 dict begin\n\
         begincmap\n\
         /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
         /CMapName /Adobe-Identity-UCS def\n\
         /CMapType 2 def\n\
         1 begincodespacerange\n\
         <0000> <FFFF>\n\
         endcodespacerange\n",
    );
    let entries: Vec<(u16, char)> = used.iter().filter(|(gid, _)| **gid != 0).map(|(g, c)| (*g, *c)).collect();
    for chunk in entries.chunks(100) {
        cmap.push_str(&format!("{} beginbfchar\n", chunk.len()));
        for (gid, ch) in chunk {
            let mut utf16 = [0u16; 2];
            let hex: String = ch.encode_utf16(&mut utf16).iter().map(|unit| format!("{:04X}", unit)).collect();
            cmap.push_str(&format!("<{:04X}> <{}>\n", gid, hex));
        }
        cmap.push_str("endbfchar\n");
    }
    cmap.push_str(
        "endcmap\n\
         CMapName currentdict /CMap defineresource pop\n\
         end\n\
         end\n",
    );
    cmap
}

/// Characters WinAnsiEncoding places at 0x80..=0x9F, `None` where the slot is unassigned.
#[rustfmt::skip]
const WIN_ANSI_80: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'), Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'), Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'), Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'), Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// WinAnsi code of `ch`, `?` when the encoding has no slot for it.
pub(crate) fn win_ansi_byte(ch: char) -> u8 {
    match u32::from(ch) {
        // C1 controls have no glyphs; those bytes mean other characters here.
        0x80..=0x9F => b'?',
        code @ 0..=0xFF => code as u8,
        _ => WIN_ANSI_80
            .iter()
            .position(|slot| *slot == Some(ch))
            .map(|i| 0x80 + i as u8)
            .unwrap_or(b'?'),
    }
}

pub(crate) fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars().map(win_ansi_byte).collect()
}
