use super::config::ExportConfig;
use super::exporter::LabelExporter;
use crate::error::PipelineError;
use labelpress_layout::SharedFontLibrary;
use labelpress_render_lopdf::{FontEmbedding, OutputFormat};
use labelpress_traits::{FontCatalog, FontLookup};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A builder for creating a [`LabelExporter`].
#[derive(Debug, Default)]
pub struct ExporterBuilder {
    lookup: Option<Arc<dyn FontLookup>>,
    font_dirs: Vec<PathBuf>,
    system_fonts: bool,
    config: ExportConfig,
}

impl ExporterBuilder {
    /// Creates a builder writing AI files to the system temp directory, with
    /// no font sources configured.
    pub fn new() -> Self {
        Default::default()
    }

    /// Resolves fonts through an uploaded-font catalog.
    pub fn with_font_catalog(self, catalog: FontCatalog) -> Self {
        self.with_font_lookup(Arc::new(catalog))
    }

    /// Loads a font catalog JSON file. Relative font paths resolve against
    /// the catalog's directory.
    pub fn with_font_catalog_file<P: AsRef<Path>>(self, path: P) -> Result<Self, PipelineError> {
        let catalog = FontCatalog::load(path.as_ref())?;
        log::info!("Loaded {} font(s) from {}", catalog.entries().len(), path.as_ref().display());
        Ok(self.with_font_catalog(catalog))
    }

    pub fn with_font_lookup(mut self, lookup: Arc<dyn FontLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    /// Adds a directory of font files consulted when outlining text.
    pub fn with_font_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.font_dirs.push(path.as_ref().to_path_buf());
        self
    }

    /// Lets outlined text fall back to installed system fonts.
    pub fn with_system_fonts(mut self, system_fonts: bool) -> Self {
        self.system_fonts = system_fonts;
        self
    }

    pub fn with_output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.output_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn with_embedding(mut self, embedding: FontEmbedding) -> Self {
        self.config.embedding = embedding;
        self
    }

    /// Consumes the builder, creating the output directory if needed.
    pub fn build(self) -> Result<LabelExporter, PipelineError> {
        fs::create_dir_all(&self.config.output_dir).map_err(|e| {
            PipelineError::Config(format!("Cannot use output directory '{}': {}", self.config.output_dir.display(), e))
        })?;

        let mut library = SharedFontLibrary::new().with_system_fonts(self.system_fonts);
        if let Some(lookup) = self.lookup {
            library = library.with_lookup(lookup);
        }
        for dir in &self.font_dirs {
            library.add_font_dir(dir);
        }
        log::debug!("Exporter configured: {:?}", self.config);
        Ok(LabelExporter::new(library, self.config))
    }
}
