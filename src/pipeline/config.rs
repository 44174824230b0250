use labelpress_render_lopdf::{FontEmbedding, OutputFormat, RenderOptions};
use std::path::PathBuf;

/// Where exported files go and how they are written.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportConfig {
    /// Directory receiving files written by [`LabelExporter::export`](super::LabelExporter::export).
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub embedding: FontEmbedding,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { output_dir: std::env::temp_dir(), format: OutputFormat::default(), embedding: FontEmbedding::default() }
    }
}

impl ExportConfig {
    /// Render options for one request's text and layering flags.
    pub fn render_options(&self, outlined: bool, separate_invisible: bool) -> RenderOptions {
        RenderOptions { format: self.format, outlined, separate_invisible, embedding: self.embedding }
    }
}
