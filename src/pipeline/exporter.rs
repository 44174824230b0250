use super::config::ExportConfig;
use super::request::{BatchExportRequest, ExportRequest};
use crate::error::PipelineError;
use labelpress_layout::{ComposedLabel, SharedFontLibrary, compose};
use labelpress_render_lopdf::{LabelRenderer, RenderOptions, RenderedDocument};
use labelpress_types::ExportWarning;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A finished export.
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub page_count: usize,
    pub warnings: Vec<ExportWarning>,
}

/// Composes and renders label requests.
///
/// The exporter is cheap to clone and safe to share between threads; the
/// only state shared across exports is the font registry.
#[derive(Debug, Clone)]
pub struct LabelExporter {
    library: SharedFontLibrary,
    config: ExportConfig,
}

impl LabelExporter {
    pub(crate) fn new(library: SharedFontLibrary, config: ExportConfig) -> Self {
        Self { library, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn font_library(&self) -> &SharedFontLibrary {
        &self.library
    }

    /// Flattens the request's document into its render-ready component list.
    pub fn compose(&self, request: &ExportRequest) -> ComposedLabel {
        compose(&request.document, &request.variables)
    }

    fn options(&self, request: &ExportRequest) -> RenderOptions {
        self.config.render_options(request.document.outlined, request.document.separate_invisible)
    }

    pub fn render_to_vec(&self, request: &ExportRequest) -> Result<RenderedDocument, PipelineError> {
        let mut bytes = Vec::new();
        let warnings = self.render_to_writer(request, &mut bytes)?;
        Ok(RenderedDocument { bytes, warnings })
    }

    pub fn render_to_writer<W: Write>(
        &self,
        request: &ExportRequest,
        writer: &mut W,
    ) -> Result<Vec<ExportWarning>, PipelineError> {
        let labels = [self.compose(request)];
        self.render_labels(&labels, self.options(request), writer)
    }

    /// Writes the request to a new uniquely named file in the output directory.
    pub fn export(&self, request: &ExportRequest) -> Result<ExportOutcome, PipelineError> {
        let labels = [self.compose(request)];
        self.write_new_file(&labels, self.options(request))
    }

    /// Writes the request to `path`. The file only appears once rendering
    /// has succeeded; an existing file is replaced.
    pub fn export_to_path<P: AsRef<Path>>(&self, request: &ExportRequest, path: P) -> Result<ExportOutcome, PipelineError> {
        let labels = [self.compose(request)];
        self.write_to_path(&labels, self.options(request), path.as_ref())
    }

    /// Writes every page of the batch into one new file in the output directory.
    pub fn export_pages(&self, batch: &BatchExportRequest) -> Result<ExportOutcome, PipelineError> {
        let (labels, options) = self.compose_batch(batch)?;
        self.write_new_file(&labels, options)
    }

    pub fn export_pages_to_path<P: AsRef<Path>>(
        &self,
        batch: &BatchExportRequest,
        path: P,
    ) -> Result<ExportOutcome, PipelineError> {
        let (labels, options) = self.compose_batch(batch)?;
        self.write_to_path(&labels, options, path.as_ref())
    }

    fn compose_batch(&self, batch: &BatchExportRequest) -> Result<(Vec<ComposedLabel>, RenderOptions), PipelineError> {
        if batch.pages.is_empty() {
            return Err(PipelineError::Config("Batch export needs at least one page".into()));
        }
        let labels = batch.pages.iter().map(|page| self.compose(page)).collect();
        Ok((labels, self.config.render_options(batch.outlined, batch.separate_invisible)))
    }

    fn render_labels<W: Write>(
        &self,
        labels: &[ComposedLabel],
        options: RenderOptions,
        writer: &mut W,
    ) -> Result<Vec<ExportWarning>, PipelineError> {
        let mut renderer = LabelRenderer::new(self.library.clone(), options);
        for label in labels {
            renderer.add_page(label)?;
        }
        let warnings = renderer.finish(writer)?;
        for warning in &warnings {
            log::warn!("{}", warning);
        }
        Ok(warnings)
    }

    /// Renders into a `.tmp` file in `dir`. The file is deleted again if
    /// anything fails before the caller persists it.
    fn render_to_temp(
        &self,
        labels: &[ComposedLabel],
        options: RenderOptions,
        dir: &Path,
    ) -> Result<(NamedTempFile, Vec<ExportWarning>), PipelineError> {
        let mut temp = tempfile::Builder::new().prefix("label-").suffix(".tmp").tempfile_in(dir)?;
        let warnings = {
            let mut writer = BufWriter::new(temp.as_file_mut());
            let warnings = self.render_labels(labels, options, &mut writer)?;
            writer.flush()?;
            warnings
        };
        temp.as_file().sync_all()?;
        Ok((temp, warnings))
    }

    fn write_new_file(&self, labels: &[ComposedLabel], options: RenderOptions) -> Result<ExportOutcome, PipelineError> {
        let dir = &self.config.output_dir;
        let suffix = format!(".{}", options.format.extension());
        let (temp, warnings) = self.render_to_temp(labels, options, dir)?;
        // Reserve a unique final name only once the content is complete.
        let (_, path) = tempfile::Builder::new().prefix("label-").suffix(&suffix).tempfile_in(dir)?.keep()?;
        if let Err(e) = temp.persist(&path) {
            let _ = fs::remove_file(&path);
            return Err(e.into());
        }
        log::info!("Exported {} page(s) to {}", labels.len(), path.display());
        Ok(ExportOutcome { path, page_count: labels.len(), warnings })
    }

    fn write_to_path(
        &self,
        labels: &[ComposedLabel],
        options: RenderOptions,
        path: &Path,
    ) -> Result<ExportOutcome, PipelineError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;
        let (temp, warnings) = self.render_to_temp(labels, options, &dir)?;
        temp.persist(path)?;
        log::info!("Exported {} page(s) to {}", labels.len(), path.display());
        Ok(ExportOutcome { path: path.to_path_buf(), page_count: labels.len(), warnings })
    }
}
