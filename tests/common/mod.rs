#![allow(dead_code)]

pub mod fixtures;
pub mod pdf_assertions;

use labelpress::{ExportRequest, ExporterBuilder, FontCatalog, LabelExporter, OutputFormat, PipelineError};
use labelpress_testing::FontFile;
use lopdf::Document as LopdfDocument;
use lopdf::content::{Content, Operation};
use serde_json::Value;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
    pub warnings: Vec<labelpress::ExportWarning>,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc, warnings: Vec::new() })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Decoded content operations of a 1-based page.
    pub fn operations(&self, page: u32) -> Vec<Operation> {
        let pages = self.doc.get_pages();
        let content = self.doc.get_page_content(pages[&page]).expect("page content");
        Content::decode(&content).expect("decodable content").operations
    }

    pub fn operators(&self, page: u32) -> Vec<String> {
        self.operations(page).into_iter().map(|op| op.operator).collect()
    }

    /// Save PDF to a file for manual debugging
    #[allow(dead_code)]
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }
}

pub fn exporter(format: OutputFormat) -> LabelExporter {
    ExporterBuilder::new().with_format(format).build().expect("exporter")
}

/// An exporter whose catalog knows the synthetic test font as `family`.
pub fn exporter_with_test_font(font: &FontFile, family: &str) -> LabelExporter {
    let catalog = FontCatalog::new().with_entry("1", family, font.path.clone());
    ExporterBuilder::new().with_font_catalog(catalog).build().expect("exporter")
}

pub fn render(exporter: &LabelExporter, document: &Value) -> Result<GeneratedPdf, PipelineError> {
    let request: ExportRequest = serde_json::from_value(document.clone())?;
    let rendered = exporter.render_to_vec(&request)?;
    let mut pdf = GeneratedPdf::from_bytes(rendered.bytes).map_err(|e| PipelineError::Config(e.to_string()))?;
    pdf.warnings = rendered.warnings;
    Ok(pdf)
}

pub fn render_ai(document: &Value) -> GeneratedPdf {
    render(&exporter(OutputFormat::Ai), document).expect("render")
}
