//! FontLookup trait for resolving a family name or uploaded-font identifier
//! to a font file on disk.
//!
//! The export core never manages font registration itself; it asks the
//! lookup and falls back to base fonts when nothing is found.

use serde::Deserialize;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for font loading operations.
#[derive(Error, Debug, Clone)]
pub enum FontError {
    #[error("Font not found: {family} (id: {font_id:?})")]
    NotFound { family: String, font_id: Option<String> },

    #[error("Failed to load font '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid font data: {0}")]
    InvalidData(String),

    #[error("Font parsing error: {0}")]
    ParseError(String),
}

/// Where a resolved font lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontLocation {
    pub path: PathBuf,
    /// The name the font was registered under (not necessarily its internal name).
    pub display_name: String,
}

/// Maps a font family and optional uploaded-font identifier to a font file.
///
/// Implementations must be cheap to call repeatedly and safe to share
/// across threads; results are cached by the caller.
pub trait FontLookup: Send + Sync + Debug {
    /// Resolve a font. The identifier, when present, takes precedence over
    /// the family name.
    fn lookup_font(&self, family: &str, font_id: Option<&str>) -> Option<FontLocation>;

    /// Returns a human-readable name for this lookup (for logging/debugging).
    fn name(&self) -> &'static str;
}

/// One uploaded font record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FontCatalogEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub path: PathBuf,
}

fn string_or_number<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Str(String),
        Num(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Str(s) => s,
        Id::Num(n) => n.to_string(),
    })
}

/// An in-memory font catalog of uploaded fonts.
///
/// Lookup tries the identifier first, then the family name (exact, then
/// ASCII case-insensitive). Relative paths in a catalog file resolve against
/// the file's directory.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    entries: Vec<FontCatalogEntry>,
}

impl FontCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, id: impl Into<String>, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.add(FontCatalogEntry { id: id.into(), name: name.into(), path: path.into() });
        self
    }

    pub fn add(&mut self, entry: FontCatalogEntry) {
        if self.entries.iter().any(|e| e.id == entry.id) {
            log::debug!("Font catalog entry '{}' replaced", entry.id);
            self.entries.retain(|e| e.id != entry.id);
        }
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[FontCatalogEntry] {
        &self.entries
    }

    pub fn from_json(source: &str, base_dir: Option<&Path>) -> Result<Self, FontError> {
        let entries: Vec<FontCatalogEntry> =
            serde_json::from_str(source).map_err(|e| FontError::ParseError(e.to_string()))?;
        let mut catalog = Self::new();
        for mut entry in entries {
            if let Some(base) = base_dir
                && entry.path.is_relative()
            {
                entry.path = base.join(&entry.path);
            }
            catalog.add(entry);
        }
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, FontError> {
        let source = std::fs::read_to_string(path).map_err(|e| FontError::LoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&source, path.parent())
    }

    fn find(&self, family: &str, font_id: Option<&str>) -> Option<&FontCatalogEntry> {
        if let Some(id) = font_id
            && let Some(entry) = self.entries.iter().find(|e| e.id == id)
        {
            return Some(entry);
        }
        if family.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.name == family)
            .or_else(|| self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(family)))
    }
}

impl FontLookup for FontCatalog {
    fn lookup_font(&self, family: &str, font_id: Option<&str>) -> Option<FontLocation> {
        let entry = self.find(family, font_id)?;
        if !entry.path.exists() {
            log::warn!("Font '{}' is registered at {} but the file is missing", entry.name, entry.path.display());
            return None;
        }
        Some(FontLocation { path: entry.path.clone(), display_name: entry.name.clone() })
    }

    fn name(&self) -> &'static str {
        "FontCatalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_lookup_prefers_id_then_name() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.ttf");
        let b = dir.path().join("b.ttf");
        fs::write(&a, b"a").unwrap();
        fs::write(&b, b"b").unwrap();

        let catalog = FontCatalog::new().with_entry("1", "Brand Sans", &a).with_entry("2", "Brand Serif", &b);

        let by_id = catalog.lookup_font("Brand Sans", Some("2")).unwrap();
        assert_eq!(by_id.path, b);

        let by_name = catalog.lookup_font("brand sans", Some("99")).unwrap();
        assert_eq!(by_name.path, a);
        assert_eq!(by_name.display_name, "Brand Sans");

        assert!(catalog.lookup_font("Unknown", None).is_none());
    }

    #[test]
    fn test_missing_file_is_not_resolved() {
        let catalog = FontCatalog::new().with_entry("1", "Ghost", "/nonexistent/ghost.ttf");
        assert!(catalog.lookup_font("Ghost", None).is_none());
    }

    #[test]
    fn test_from_json_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let catalog =
            FontCatalog::from_json(r#"[{"id": 4, "name": "Label Mono", "path": "fonts/mono.ttf"}]"#, Some(dir.path()))
                .unwrap();
        let entry = &catalog.entries()[0];
        assert_eq!(entry.id, "4");
        assert_eq!(entry.path, dir.path().join("fonts/mono.ttf"));
    }
}
