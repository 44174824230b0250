//! TrueType subsetting for embedded fonts.
//!
//! `subsetter` empties the outlines of unused glyphs instead of renumbering
//! them, so text written as raw glyph ids with an identity CID mapping stays
//! valid. Components of kept composite glyphs and `.notdef` are always kept.

use crate::error::RenderError;
use std::collections::BTreeSet;
use ttf_parser::{RawFace, Tag};

/// Whether the font carries TrueType outlines that [`subset_truetype`] can strip.
pub fn has_glyf_outlines(data: &[u8]) -> bool {
    RawFace::parse(data, 0)
        .map(|face| face.table(Tag::from_bytes(b"glyf")).is_some() && face.table(Tag::from_bytes(b"loca")).is_some())
        .unwrap_or(false)
}

/// Reduces `data` to the glyphs in `used`, keeping every glyph id in place.
pub fn subset_truetype(data: &[u8], used: &BTreeSet<u16>) -> Result<Vec<u8>, RenderError> {
    let glyphs: Vec<u16> = used.iter().copied().collect();
    let program = subsetter::subset(data, 0, subsetter::Profile::pdf(&glyphs))
        .map_err(|e| RenderError::Subset(e.to_string()))?;
    log::debug!("Subset font: kept {} glyphs, {} -> {} bytes", glyphs.len(), data.len(), program.len());
    Ok(program)
}
