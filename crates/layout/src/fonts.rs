//! Font library shared across export calls.
//!
//! `SharedFontLibrary` resolves a family/identifier through the injected
//! [`FontLookup`], loads the file once, and keeps it in a read-mostly
//! registry keyed by path. Registering the same font concurrently is a no-op
//! for every caller but the first.
//!
//! With the `system-fonts` feature, installed fonts (via fontdb) can stand in
//! for the base families when outlining text.

use labelpress_traits::{FontError, FontLookup};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// A parsed-on-demand font file held in memory.
pub struct LoadedFont {
    pub data: Arc<Vec<u8>>,
    pub path: PathBuf,
    /// Internal name used for cross-application matching: the PostScript
    /// name, else the full name, else the family (spaces removed).
    pub postscript_name: String,
    pub family: String,
}

impl fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedFont")
            .field("postscript_name", &self.postscript_name)
            .field("path", &self.path)
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl LoadedFont {
    pub fn from_bytes(data: Vec<u8>, path: PathBuf) -> Result<Self, FontError> {
        let face = ttf_parser::Face::parse(&data, 0).map_err(|e| FontError::ParseError(e.to_string()))?;
        let family = name_entry(&face, ttf_parser::name_id::FAMILY).unwrap_or_default();
        let postscript_name = extract_postscript_name(&face)
            .ok_or_else(|| FontError::InvalidData(format!("no usable name in {}", path.display())))?;
        drop(face);
        Ok(Self { data: Arc::new(data), path, postscript_name, family })
    }

    /// Creates a lightweight Face view over the font data.
    pub fn face(&self) -> Result<ttf_parser::Face<'_>, FontError> {
        ttf_parser::Face::parse(&self.data, 0).map_err(|e| FontError::ParseError(e.to_string()))
    }

    pub fn file_size(&self) -> usize {
        self.data.len()
    }
}

fn name_entry(face: &ttf_parser::Face<'_>, id: u16) -> Option<String> {
    face.names()
        .into_iter()
        .find(|n| n.name_id == id)
        .and_then(|n| n.to_string())
        .filter(|s| !s.trim().is_empty())
}

fn extract_postscript_name(face: &ttf_parser::Face<'_>) -> Option<String> {
    if let Some(ps_name) = name_entry(face, ttf_parser::name_id::POST_SCRIPT_NAME) {
        log::debug!("Found PostScript name (ID 6): {}", ps_name);
        return Some(ps_name);
    }
    if let Some(full_name) = name_entry(face, ttf_parser::name_id::FULL_NAME) {
        log::debug!("Using Full Name (ID 4) as fallback: {}", full_name);
        return Some(full_name.replace(' ', ""));
    }
    if let Some(family) = name_entry(face, ttf_parser::name_id::FAMILY) {
        log::debug!("Using Family Name (ID 1) as fallback: {}", family);
        return Some(family.replace(' ', ""));
    }
    log::warn!("Could not extract any usable name from font data");
    None
}

/// Installed-font stand-ins for the three base families.
fn system_candidates(family: &str) -> &'static [&'static str] {
    match family.to_ascii_lowercase().as_str() {
        "times new roman" | "times" | "times-roman" => &["Times New Roman", "Times", "Liberation Serif"],
        "courier new" | "courier" => &["Courier New", "Courier", "Liberation Mono"],
        _ => &["Arial", "Helvetica", "Liberation Sans"],
    }
}

#[derive(Clone)]
pub struct SharedFontLibrary {
    lookup: Option<Arc<dyn FontLookup>>,

    /// fontdb database for system fonts (only available with system-fonts feature)
    #[cfg(feature = "system-fonts")]
    db: Arc<RwLock<fontdb::Database>>,

    /// Loaded fonts, keyed by file path.
    registry: Arc<RwLock<HashMap<PathBuf, Arc<LoadedFont>>>>,
}

impl fmt::Debug for SharedFontLibrary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedFontLibrary")
            .field("lookup", &self.lookup.as_ref().map(|l| l.name()))
            .field("registered", &self.registered_fonts().len())
            .finish()
    }
}

impl Default for SharedFontLibrary {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedFontLibrary {
    /// Creates a new empty font library.
    pub fn new() -> Self {
        Self {
            lookup: None,
            #[cfg(feature = "system-fonts")]
            db: Arc::new(RwLock::new(fontdb::Database::new())),
            registry: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn from_lookup(lookup: Arc<dyn FontLookup>) -> Self {
        Self::new().with_lookup(lookup)
    }

    pub fn with_lookup(mut self, lookup: Arc<dyn FontLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Enables system font loading (native platforms only).
    #[cfg(feature = "system-fonts")]
    pub fn with_system_fonts(self, enable: bool) -> Self {
        if enable && let Ok(mut db) = self.db.write() {
            db.load_system_fonts();
            log::debug!("Loaded {} system font faces", db.len());
        }
        self
    }

    /// Scans a directory for font files usable as system stand-ins.
    #[cfg(feature = "system-fonts")]
    pub fn add_font_dir<P: AsRef<Path>>(&self, path: P) {
        if let Ok(mut db) = self.db.write() {
            db.load_fonts_dir(path);
        }
    }

    #[cfg(not(feature = "system-fonts"))]
    pub fn with_system_fonts(self, enable: bool) -> Self {
        if enable {
            log::warn!("System fonts requested but the system-fonts feature is disabled");
        }
        self
    }

    #[cfg(not(feature = "system-fonts"))]
    pub fn add_font_dir<P: AsRef<Path>>(&self, path: P) {
        log::warn!("Ignoring font dir {} (system-fonts feature disabled)", path.as_ref().display());
    }

    /// Resolves a font through the lookup only.
    pub fn resolve(&self, family: &str, font_id: Option<&str>) -> Result<Arc<LoadedFont>, FontError> {
        let not_found = || FontError::NotFound { family: family.to_string(), font_id: font_id.map(str::to_string) };
        let lookup = self.lookup.as_ref().ok_or_else(not_found)?;
        let location = lookup.lookup_font(family, font_id).ok_or_else(not_found)?;
        log::debug!("Font '{}' resolved by {} to {}", family, lookup.name(), location.path.display());
        self.load_path(&location.path)
    }

    /// Resolves a font for outlining: the lookup first, then installed
    /// system fonts standing in for the base families.
    pub fn resolve_for_outline(
        &self,
        family: &str,
        font_id: Option<&str>,
        bold: bool,
        italic: bool,
    ) -> Result<Arc<LoadedFont>, FontError> {
        match self.resolve(family, font_id) {
            Ok(font) => Ok(font),
            Err(err) => self.resolve_system(family, bold, italic).ok_or(err),
        }
    }

    #[cfg(feature = "system-fonts")]
    fn resolve_system(&self, family: &str, bold: bool, italic: bool) -> Option<Arc<LoadedFont>> {
        let db = self.db.read().ok()?;
        let families: Vec<fontdb::Family<'_>> = std::iter::once(family)
            .chain(system_candidates(family).iter().copied())
            .map(fontdb::Family::Name)
            .collect();
        let id = db.query(&fontdb::Query {
            families: &families,
            weight: if bold { fontdb::Weight::BOLD } else { fontdb::Weight::NORMAL },
            stretch: fontdb::Stretch::Normal,
            style: if italic { fontdb::Style::Italic } else { fontdb::Style::Normal },
        })?;
        let face_info = db.face(id)?;
        log::debug!("System font {:?} stands in for '{}'", face_info.families, family);

        match &face_info.source {
            fontdb::Source::File(path) => {
                let path = path.clone();
                drop(db);
                self.load_path(&path).ok()
            }
            fontdb::Source::Binary(data) => {
                let bytes: Vec<u8> = data.as_ref().as_ref().to_vec();
                let key = PathBuf::from(format!("fontdb:{}", face_info.post_script_name));
                drop(db);
                self.register(key, bytes).ok()
            }
            #[allow(unreachable_patterns)]
            _ => {
                log::warn!("Unsupported font source type for '{}'", family);
                None
            }
        }
    }

    #[cfg(not(feature = "system-fonts"))]
    fn resolve_system(&self, family: &str, _bold: bool, _italic: bool) -> Option<Arc<LoadedFont>> {
        log::debug!("No system font stand-in for '{}' ({:?})", family, system_candidates(family));
        None
    }

    /// Loads and registers a font file. Subsequent calls with the same path
    /// return the registered instance.
    pub fn load_path(&self, path: &Path) -> Result<Arc<LoadedFont>, FontError> {
        if let Ok(registry) = self.registry.read()
            && let Some(font) = registry.get(path)
        {
            return Ok(font.clone());
        }

        let data = std::fs::read(path).map_err(|e| FontError::LoadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.register(path.to_path_buf(), data)
    }

    /// Parses font bytes and stores them under `key`, keeping any instance
    /// registered first.
    fn register(&self, key: PathBuf, data: Vec<u8>) -> Result<Arc<LoadedFont>, FontError> {
        let path = key.as_path();
        let loaded = Arc::new(LoadedFont::from_bytes(data, key.clone())?);

        let mut registry = self.registry.write().map_err(|_| FontError::LoadFailed {
            path: path.display().to_string(),
            message: "font registry lock poisoned".to_string(),
        })?;
        let entry = registry.entry(path.to_path_buf()).or_insert_with(|| {
            log::debug!("Font '{}' registered from {}", loaded.postscript_name, path.display());
            loaded
        });
        Ok(entry.clone())
    }

    pub fn registered_fonts(&self) -> Vec<Arc<LoadedFont>> {
        self.registry.read().map(|r| r.values().cloned().collect()).unwrap_or_default()
    }
}
