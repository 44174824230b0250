//! Label export: flattens label layouts into paint-ordered components and
//! renders them as PDF or Illustrator-compatible vector files.
//!
//! ```ignore
//! use labelpress::{ExportRequest, ExporterBuilder, OutputFormat};
//!
//! let exporter = ExporterBuilder::new()
//!     .with_font_catalog_file("fonts.json")?
//!     .with_output_dir("out")
//!     .with_format(OutputFormat::Pdf)
//!     .build()?;
//!
//! let request = ExportRequest::from_path("label.json")?;
//! let outcome = exporter.export(&request)?;
//! println!("{} ({} warnings)", outcome.path.display(), outcome.warnings.len());
//! ```

pub mod error;
pub mod pipeline;

pub use error::PipelineError;
pub use pipeline::{BatchExportRequest, ExportConfig, ExportOutcome, ExportRequest, ExporterBuilder, LabelExporter};

pub use labelpress_layout::{ComposedLabel, SharedFontLibrary, VariableValues, compose};
pub use labelpress_render_lopdf::{FontEmbedding, OutputFormat, RenderOptions, RenderedDocument};
pub use labelpress_traits::{FontCatalog, FontError, FontLocation, FontLookup};
pub use labelpress_types::{Component, ComponentId, ExportWarning, LabelDocument};
